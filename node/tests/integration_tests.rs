use provenance_ledger::config::{Genesis, LedgerProfile};
use provenance_ledger::error::LedgerError;
use provenance_ledger::replay::replay_and_prove;
use provenance_ledger::types::{Account, PointId, TransferId, TransferType};
use provenance_node::config::NodeConfig;
use provenance_node::engine::Engine;
use provenance_node::errors::EngineError;
use provenance_node::events::read_event_log;
use tempfile::tempdir;

const ADMIN: Account = Account([0xAA; 20]);
const OLEG: Account = Account([0x01; 20]);
const IVAN: Account = Account([0x02; 20]);

fn config() -> NodeConfig {
    let mut cfg = NodeConfig::default();
    cfg.genesis = Genesis::new(ADMIN).with_profile(LedgerProfile {
        company_name: "Samsung".into(),
        location: "Seoul, South Korea".into(),
        description: "Samsung Group is a South Korean group of companies.".into(),
    });
    cfg
}

fn add_point(engine: &mut Engine, owner: Account) -> PointId {
    engine
        .create_point(
            ADMIN,
            "Some name1".into(),
            "Some country1".into(),
            "Some city2".into(),
            "Some address2".into(),
            owner,
        )
        .unwrap()
}

fn add_transfer(engine: &mut Engine, caller: Account, point: PointId, ty: TransferType, batch: &str) -> TransferId {
    engine
        .create_product_transfer(caller, point, "https://ipfs.io/ipfs/QmS4ustL54uo8F".into(), ty, batch.into())
        .unwrap()
}

#[test]
fn test_engine_workflow() {
    let mut engine = Engine::new(&config());

    let p0 = add_point(&mut engine, OLEG);
    let p1 = add_point(&mut engine, IVAN);
    assert_eq!((p0, p1), (PointId(0), PointId(1)));

    let t0 = add_transfer(&mut engine, OLEG, p0, TransferType::Manufacture, "0000101");
    let t1 = add_transfer(&mut engine, IVAN, p1, TransferType::Transport, "0000101");
    let t2 = add_transfer(&mut engine, OLEG, p0, TransferType::Manufacture, "0000102");

    assert_eq!(engine.batch("0000101"), &[t0, t1]);
    assert_eq!(engine.batch("0000102"), &[t2]);
    assert_eq!(engine.batch_entry("0000101", 1).unwrap(), t1);
    assert!(engine.batch("unknown").is_empty());

    assert_eq!(engine.product_transfer(t1).unwrap().point_id, p1);
    assert_eq!(engine.state().points_total(), 2);
    assert_eq!(engine.state().product_transfers_total(), 3);
    assert_eq!(engine.state().version(), 5);
    assert_eq!(engine.profile().company_name, "Samsung");
}

#[test]
fn test_rejected_command_leaves_state_untouched() {
    let mut engine = Engine::new(&config());
    let p0 = add_point(&mut engine, OLEG);
    let before = engine.state().clone();
    let proof_before = engine.get_proof();

    let err = engine
        .create_product_transfer(IVAN, p0, "link".into(), TransferType::Transport, "0000101".into())
        .unwrap_err();
    assert_eq!(err.code(), "E-88");

    let err = engine
        .create_point(OLEG, "n".into(), "c".into(), "c".into(), "a".into(), OLEG)
        .unwrap_err();
    assert!(matches!(err, EngineError::Ledger(LedgerError::AccessDenied { .. })));

    assert_eq!(engine.state(), &before);
    assert_eq!(engine.get_proof(), proof_before);
}

#[test]
fn test_event_log_recovery_across_reopen() {
    let dir = tempdir().unwrap();
    let mut cfg = config();
    cfg.event_log_path = Some(dir.path().join("events.log"));

    let (state, proof) = {
        let mut engine = Engine::open(&cfg).unwrap();
        assert!(engine.event_log_enabled());
        let p0 = add_point(&mut engine, OLEG);
        add_transfer(&mut engine, OLEG, p0, TransferType::Manufacture, "0000101");
        engine.transfer_point_ownership(ADMIN, p0, IVAN).unwrap();
        add_transfer(&mut engine, IVAN, p0, TransferType::Realization, "0000101");
        // A rejected command must not reach the log.
        assert!(engine.transfer_administrator(OLEG, IVAN).is_err());
        (engine.state().clone(), engine.get_proof())
    };

    let events = read_event_log(cfg.event_log_path.as_ref().unwrap()).unwrap();
    assert_eq!(events.len(), 4);

    let reopened = Engine::open(&cfg).unwrap();
    assert_eq!(reopened.state(), &state);
    assert_eq!(reopened.get_proof(), proof);
    assert_eq!(reopened.point(PointId(0)).unwrap().owner, IVAN);
}

#[test]
fn test_proof_matches_offline_replay() {
    let dir = tempdir().unwrap();
    let mut cfg = config();
    cfg.event_log_path = Some(dir.path().join("events.log"));

    let mut engine = Engine::open(&cfg).unwrap();
    let p0 = add_point(&mut engine, OLEG);
    add_transfer(&mut engine, OLEG, p0, TransferType::Manufacture, "0000101");
    engine.transfer_administrator(ADMIN, IVAN).unwrap();

    let events = read_event_log(cfg.event_log_path.as_ref().unwrap()).unwrap();
    let (replayed, proof) = replay_and_prove(&cfg.genesis, &[], &events).unwrap();

    assert_eq!(&replayed, engine.state());
    assert_eq!(proof, engine.get_proof());
    assert_eq!(proof.event_count, 3);
    assert!(proof.snapshot_hash.is_none());
}

#[test]
fn test_restore_refused_with_event_log() {
    let dir = tempdir().unwrap();
    let mut cfg = config();
    cfg.event_log_path = Some(dir.path().join("events.log"));

    let mut engine = Engine::open(&cfg).unwrap();
    add_point(&mut engine, OLEG);
    let snapshot = engine.snapshot().unwrap();

    assert!(matches!(engine.restore(&snapshot), Err(EngineError::InvalidInput(_))));
}

#[test]
fn test_snapshot_save_and_restore_on_open() {
    let dir = tempdir().unwrap();
    let mut cfg = config();
    cfg.snapshot_path = Some(dir.path().join("ledger.snap"));

    let mut engine = Engine::open(&cfg).unwrap();
    let p0 = add_point(&mut engine, OLEG);
    add_transfer(&mut engine, OLEG, p0, TransferType::Manufacture, "0000101");
    let path = engine.save_snapshot().unwrap();
    assert_eq!(Some(path), cfg.snapshot_path);

    let restored = Engine::open(&cfg).unwrap();
    assert_eq!(restored.state(), engine.state());

    let proof = restored.get_proof();
    assert_eq!(proof.snapshot_hash, engine.current_snapshot_hash);
    assert_eq!(proof.event_count, 0);

    let snapshot = std::fs::read(cfg.snapshot_path.as_ref().unwrap()).unwrap();
    let (_, offline) = replay_and_prove(&cfg.genesis, &snapshot, &[]).unwrap();
    assert_eq!(offline, proof);
}

#[test]
fn test_corrupt_snapshot_is_rejected() {
    let mut engine = Engine::new(&config());
    add_point(&mut engine, OLEG);
    let mut snapshot = engine.snapshot().unwrap();
    let mid = snapshot.len() / 2;
    snapshot[mid] ^= 0xFF;

    let mut fresh = Engine::new(&config());
    assert!(fresh.restore(&snapshot).is_err());
    assert_eq!(fresh.state().points_total(), 0);
}
