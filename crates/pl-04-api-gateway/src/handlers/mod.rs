//! Request handlers, grouped by API area.

pub mod contracts;
pub mod p2p;
pub mod system;

use shared_types::ContractId;

use crate::domain::error::{ApiError, ApiResult};

pub(crate) fn parse_contract_id(raw: &str) -> ApiResult<ContractId> {
    raw.trim()
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("invalid contract id: {raw}")))
}
