//! End-to-end inventory scenarios.

use stochsim_inventory::{InventoryConfig, InventoryModel};
use stochsim_simulation::Simulation;

#[test]
fn test_total_cost_is_sum_of_components() {
    let config = InventoryConfig::default()
        .with_policy(20, 40)
        .with_horizon(120.0);
    let mut sim = Simulation::new(InventoryModel::new(config).unwrap(), 2024).unwrap();
    sim.run().unwrap();

    let model = sim.model();
    let total = model.average_total_cost();
    let parts = model.average_ordering_cost()
        + model.average_holding_cost()
        + model.average_shortage_cost();

    assert!(total > 0.0);
    assert!((total - parts).abs() < 1e-9);
    assert_eq!(sim.clock(), 120.0);
}

#[test]
fn test_same_seed_same_costs() {
    let run = |seed| {
        let mut sim =
            Simulation::new(InventoryModel::new(InventoryConfig::default()).unwrap(), seed)
                .unwrap();
        sim.run().unwrap();
        (
            sim.events_processed(),
            sim.model().average_total_cost(),
            sim.model().level_trajectory(),
        )
    };

    assert_eq!(run(31), run(31));
    assert_ne!(run(31).1, run(32).1);
}
