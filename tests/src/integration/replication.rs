//! # Replication Flows
//!
//! Workflow changes made on one node reach the others either by push
//! (block broadcast) or by pull (longest-valid-chain sync). All nodes run
//! in-process on an `InMemoryNetwork`.
//!
//! ## Flows Tested:
//!
//! 1. **Push**: a full six-step approval on one node is replayed by every peer
//! 2. **Pull**: a node that was offline catches up on its next sync
//! 3. **Fork**: of two equal-length chains neither wins; one more block decides
//! 4. **Replay**: every node's contract index equals a rebuild from its chain

#[cfg(test)]
mod tests {
    use pl_02_contract_workflow::{
        AuditObservation, ContractFilter, ContractRegistry, NewContract, StepDecision,
        WorkflowApi, WorkflowError, WORKFLOW_STEPS,
    };
    use pl_03_peer_sync::test_utils::{InMemoryNetwork, TestNode};
    use pl_03_peer_sync::{SyncApi, SyncError};
    use pl_01_chain_integrity::Block;
    use rust_decimal::Decimal;
    use shared_types::{AdminRole, ContractId, ContractStatus};
    use std::sync::Arc;

    // =========================================================================
    // FIXTURES
    // =========================================================================

    fn school_laptops() -> NewContract {
        NewContract {
            entity_code: "SED-BOG-002".to_string(),
            entity_name: "Secretaría de Educación de Bogotá".to_string(),
            contract_type: "SUMINISTRO".to_string(),
            description: "Dotación de computadores portátiles para colegios".to_string(),
            amount: Decimal::new(800_000_000, 0),
            created_by: "compras-001".to_string(),
        }
    }

    fn approve(step: usize) -> StepDecision {
        let template = &WORKFLOW_STEPS[step - 1];
        StepDecision {
            step_number: template.step_number,
            validator_id: format!("validator-{step}"),
            validator_name: "Validador".to_string(),
            role: template.role,
            approved: true,
            comments: "Conforme".to_string(),
        }
    }

    fn reject(step: usize) -> StepDecision {
        StepDecision {
            approved: false,
            comments: "Falta soporte presupuestal".to_string(),
            ..approve(step)
        }
    }

    /// Three nodes, fully meshed.
    fn cluster() -> (Arc<InMemoryNetwork>, [TestNode; 3]) {
        let network = InMemoryNetwork::new();
        let nodes = [
            TestNode::spawn(&network, "NODE-A", 8080),
            TestNode::spawn(&network, "NODE-B", 8081),
            TestNode::spawn(&network, "NODE-C", 8082),
        ];
        for node in &nodes {
            for other in &nodes {
                if node.id != other.id {
                    node.connect(other);
                }
            }
        }
        (network, nodes)
    }

    /// Broadcast and wait for every delivery; returns the failure count.
    async fn push(node: &TestNode, block: Block) -> usize {
        let mut failures = 0;
        for handle in node.sync.broadcast_block(block) {
            if handle.await.unwrap().is_err() {
                failures += 1;
            }
        }
        failures
    }

    fn status_on(node: &TestNode, id: ContractId) -> ContractStatus {
        node.workflow.get_contract(id).unwrap().status
    }

    fn assert_index_matches_replay(node: &TestNode) {
        let ledger = node.ledger.read();
        assert!(ledger.chain().is_valid());
        assert_eq!(&ContractRegistry::rebuild(ledger.chain()), ledger.contracts());
    }

    // =========================================================================
    // PUSH
    // =========================================================================

    #[tokio::test]
    async fn test_full_approval_replicates_to_every_peer() {
        let (_network, [a, b, c]) = cluster();

        let (contract, block) = a.workflow.create_contract(school_laptops()).unwrap();
        assert_eq!(push(&a, block).await, 0);
        for step in 1..=6 {
            let block = a.workflow.validate_step(contract.id, approve(step)).unwrap();
            assert_eq!(push(&a, block).await, 0);
        }

        for node in [&a, &b, &c] {
            assert_eq!(node.chain_len(), 8);
            assert_eq!(node.tip_hash(), a.tip_hash());
            assert_eq!(
                status_on(node, contract.id),
                ContractStatus::AuthorizedForPublication
            );
            let status = node.workflow.get_workflow_status(contract.id).unwrap();
            assert_eq!(status.completed_steps, 6);
            assert!(!status.can_advance);
            // creation, six approvals and the completion entry
            assert_eq!(status.audit_trail.len(), 8);
            assert_index_matches_replay(node);
        }
    }

    #[tokio::test]
    async fn test_approvals_can_come_from_different_nodes() {
        let (_network, [a, b, c]) = cluster();

        let (contract, block) = a.workflow.create_contract(school_laptops()).unwrap();
        push(&a, block).await;
        // each step is validated on whichever node the validator uses
        let nodes = [&a, &b, &c, &a, &b, &c];
        for (step, node) in (1..=6).zip(nodes) {
            let block = node.workflow.validate_step(contract.id, approve(step)).unwrap();
            assert_eq!(push(node, block).await, 0);
        }

        for node in [&a, &b, &c] {
            assert_eq!(node.tip_hash(), c.tip_hash());
            assert_eq!(
                status_on(node, contract.id),
                ContractStatus::AuthorizedForPublication
            );
        }
    }

    #[tokio::test]
    async fn test_rejection_replicates_and_blocks_further_steps_everywhere() {
        let (_network, [a, b, c]) = cluster();

        let (contract, block) = a.workflow.create_contract(school_laptops()).unwrap();
        push(&a, block).await;
        for step in 1..=2 {
            let block = a.workflow.validate_step(contract.id, approve(step)).unwrap();
            push(&a, block).await;
        }
        let block = b.workflow.validate_step(contract.id, reject(3)).unwrap();
        push(&b, block).await;

        for node in [&a, &b, &c] {
            assert_eq!(status_on(node, contract.id), ContractStatus::Rejected);
            assert!(matches!(
                node.workflow.validate_step(contract.id, approve(3)),
                Err(WorkflowError::TerminalState(_))
            ));
        }
        assert_eq!(
            c.workflow
                .list_contracts(ContractFilter::Status(ContractStatus::Rejected))
                .len(),
            1
        );
        assert!(c
            .workflow
            .list_contracts(ContractFilter::Role(AdminRole::LegalCommission))
            .is_empty());
    }

    #[tokio::test]
    async fn test_audit_observation_replicates() {
        let (_network, [a, b, _c]) = cluster();

        let (contract, block) = a.workflow.create_contract(school_laptops()).unwrap();
        push(&a, block).await;
        let observation = AuditObservation {
            auditor_id: "contraloria-7".to_string(),
            role: AdminRole::Comptroller,
            observation: "Verificar estudio de mercado".to_string(),
        };
        let block = b
            .workflow
            .add_audit_observation(contract.id, observation)
            .unwrap();
        push(&b, block).await;

        let trail = a.workflow.get_workflow_status(contract.id).unwrap().audit_trail;
        assert_eq!(trail.len(), 2);
        assert_eq!(trail[1].user_id, "contraloria-7");
        assert_eq!(status_on(&a, contract.id), ContractStatus::Draft);
    }

    // =========================================================================
    // PULL
    // =========================================================================

    #[tokio::test]
    async fn test_offline_node_catches_up_on_sync() {
        let (network, [a, b, c]) = cluster();
        network.set_reachable(&c.endpoint(), false);

        let (contract, block) = a.workflow.create_contract(school_laptops()).unwrap();
        assert_eq!(push(&a, block).await, 1);
        for step in 1..=3 {
            let block = a.workflow.validate_step(contract.id, approve(step)).unwrap();
            push(&a, block).await;
        }
        assert_eq!(c.chain_len(), 1);
        assert_eq!(b.chain_len(), 5);

        network.set_reachable(&c.endpoint(), true);
        let report = c.sync.sync_with_peers().await.unwrap();
        assert!(report.adopted_from.is_some());
        assert_eq!(report.chain_length, 5);
        assert_eq!(c.tip_hash(), a.tip_hash());
        assert_eq!(status_on(&c, contract.id), ContractStatus::ContractsReview);
        assert_index_matches_replay(&c);

        // a's health check brings c back into rotation
        let report = a.sync.health_check().await;
        assert_eq!(report.alive.len(), 2);
        let block = a.workflow.validate_step(contract.id, approve(4)).unwrap();
        assert_eq!(push(&a, block).await, 0);
        assert_eq!(c.tip_hash(), a.tip_hash());
    }

    #[tokio::test]
    async fn test_gap_is_rejected_on_push_and_repaired_by_sync() {
        let (network, [a, b, _c]) = cluster();
        network.set_reachable(&b.endpoint(), false);
        let (contract, block) = a.workflow.create_contract(school_laptops()).unwrap();
        push(&a, block).await;

        network.set_reachable(&b.endpoint(), true);
        let next = a.workflow.validate_step(contract.id, approve(1)).unwrap();
        assert!(matches!(
            b.sync.receive_block(next),
            Err(SyncError::InvalidBlock(_))
        ));
        assert_eq!(b.chain_len(), 1);

        b.sync.sync_with_peers().await.unwrap();
        assert_eq!(b.chain_len(), 3);
        assert_eq!(status_on(&b, contract.id), ContractStatus::TechnicalReview);
    }

    // =========================================================================
    // FORKS
    // =========================================================================

    #[tokio::test]
    async fn test_longest_chain_decides_between_forks() {
        let network = InMemoryNetwork::new();
        let a = TestNode::spawn(&network, "NODE-A", 8080);
        let b = TestNode::spawn(&network, "NODE-B", 8081);
        a.connect(&b);
        b.connect(&a);

        let from_a = a.workflow.create_contract(school_laptops()).unwrap().0.id;
        let from_b = b.workflow.create_contract(school_laptops()).unwrap().0.id;

        // equal length: both keep their own history
        b.sync.sync_with_peers().await.unwrap();
        a.sync.sync_with_peers().await.unwrap();
        assert!(b.workflow.get_contract(from_b).is_ok());
        assert!(a.workflow.get_contract(from_a).is_ok());
        assert_ne!(a.tip_hash(), b.tip_hash());

        a.workflow.validate_step(from_a, approve(1)).unwrap();
        let report = b.sync.sync_with_peers().await.unwrap();
        assert_eq!(report.adopted_from.as_deref(), Some("NODE-A"));
        assert_eq!(b.tip_hash(), a.tip_hash());
        assert!(matches!(
            b.workflow.get_contract(from_b),
            Err(WorkflowError::ContractNotFound(_))
        ));
        assert_eq!(status_on(&b, from_a), ContractStatus::TechnicalReview);
        assert_index_matches_replay(&b);
    }

    #[tokio::test]
    async fn test_stats_agree_after_convergence() {
        let (_network, [a, b, c]) = cluster();
        for _ in 0..3 {
            let (_, block) = a.workflow.create_contract(school_laptops()).unwrap();
            push(&a, block).await;
        }

        let expected = a.workflow.ledger_stats();
        for node in [&b, &c] {
            let stats = node.workflow.ledger_stats();
            assert_eq!(stats.chain_length, expected.chain_length);
            assert_eq!(stats.contract_count, 3);
            assert_eq!(stats.latest_block_hash, expected.latest_block_hash);
            assert!(stats.chain_valid);
        }
    }
}
