//! End-to-end pipeline: polygon analysis over a small design, bulk
//! loading the hierarchical index, parallel queries, and a reproducible
//! annealing run over a CPU-style layout.

use zlayout::*;

fn init_logging() {
    let _ = pretty_env_logger::try_init();
}

fn square(x: float, y: float, size: float) -> Polygon {
    Polygon::new(vec![
        Point::new(x, y),
        Point::new(x + size, y),
        Point::new(x + size, y + size),
        Point::new(x, y + size),
    ])
    .unwrap()
}

#[test]
fn polygon_analysis_pipeline() {
    init_logging();
    let _lib = Library::initialize(false);

    // A wiring polygon with a deliberate cusp next to a clean pad
    let wire = Polygon::new(vec![
        Point::new(0.0, 0.0),
        Point::new(10.0, 0.0),
        Point::new(1.0, 1.0),
        Point::new(0.0, 10.0),
    ])
    .unwrap();
    let sharp = wire.get_sharp_angles(45.0);
    assert!(sharp.contains(&2));

    let pad_a = square(20.0, 0.0, 5.0);
    let pad_b = square(26.5, 0.0, 5.0);
    assert!((pad_a.distance_to(&pad_b) - 1.5).abs() < 1e-9);

    let regions = pad_a.find_narrow_regions(&pad_b, 2.0);
    assert!(!regions.is_empty());
    for (p1, p2, d) in &regions {
        assert!((p1.distance_to(*p2) - d).abs() < 1e-8);
        assert!(*d < 2.0);
    }
    assert!(!pad_a.intersects(&pad_b));
}

#[test]
fn hierarchical_index_bulk_load_and_query() {
    init_logging();
    let world = Rectangle::new(0.0, 0.0, 100_000.0, 100_000.0);
    let mut index: HierarchicalSpatialIndex<Rectangle> =
        SpatialIndexFactory::create_optimized_index(world, 20_000);
    index
        .create_ip_block("cpu", Rectangle::new(0.0, 0.0, 50_000.0, 50_000.0), "root")
        .unwrap();
    index
        .create_ip_block("cache", Rectangle::new(50_000.0, 0.0, 50_000.0, 50_000.0), "root")
        .unwrap();

    // Deterministic pseudo-random population over the whole world
    let mut seed = 0x2545_F491_4F6C_DD1Du64;
    let mut next = move || {
        seed ^= seed << 13;
        seed ^= seed >> 7;
        seed ^= seed << 17;
        (seed >> 11) as float / (1u64 << 53) as float
    };
    let count = 20_000;
    let objects: Vec<Rectangle> = (0..count)
        .map(|_| {
            Rectangle::new(
                next() * 99_999.0,
                next() * 99_999.0,
                0.001,
                0.001,
            )
        })
        .collect();

    index.parallel_bulk_insert(objects.clone());

    // No loss, no duplicates over the full world
    let everything = index.parallel_query_range(&world);
    assert_eq!(everything.len(), count);
    let unique: std::collections::HashSet<_> = everything.iter().copied().collect();
    assert_eq!(unique.len(), count);

    // A window query agrees with a brute-force filter
    let window = Rectangle::new(10_000.0, 10_000.0, 5_000.0, 5_000.0);
    let mut from_index = index.parallel_query_range(&window);
    let mut brute: Vec<Rectangle> = objects
        .iter()
        .copied()
        .filter(|r| r.intersects(&window))
        .collect();
    let key = |r: &Rectangle| (OrderedFloat(r.x), OrderedFloat(r.y));
    from_index.sort_by_key(key);
    brute.sort_by_key(key);
    assert_eq!(from_index, brute);

    let stats = index.get_statistics();
    assert_eq!(stats.total_objects, count);
    assert!(stats.total_blocks >= 3);
}

#[test]
fn annealing_run_is_reproducible() {
    init_logging();

    let build = || {
        let config = OptimizationConfig::builder()
            .max_iterations(10_000)
            .build();
        let mut sa = SimulatedAnnealingOptimizer::with_seed(
            Rectangle::new(0.0, 0.0, 100.0, 100.0),
            config,
            42,
        );
        for (i, &(w, h, power)) in [
            (8.0, 8.0, 5.0),
            (8.0, 8.0, 5.0),
            (4.0, 6.0, 1.5),
            (4.0, 6.0, 1.5),
            (6.0, 4.0, 2.0),
            (10.0, 4.0, 3.0),
        ]
        .iter()
        .enumerate()
        {
            let mut comp = Component::new(format!("core{i}"), Rectangle::new(0.0, 0.0, w, h));
            comp.power_consumption = power;
            sa.add_component(comp);
        }
        let mut clk = Net::new("clk", "core0", "clk_out");
        for i in 1..6 {
            clk.add_sink(format!("core{i}"), "clk_in");
        }
        clk.criticality = 0.9;
        sa.add_net(clk);

        let mut data = Net::new("data", "core1", "d_out");
        data.add_sink("core2", "d_in");
        data.add_sink("core3", "d_in");
        data.weight = 2.0;
        sa.add_net(data);
        sa
    };

    let mut first = build();
    let mut second = build();
    let cost_a = first.optimize();
    let cost_b = second.optimize();

    assert_eq!(cost_a.total_cost, cost_b.total_cost);
    assert_eq!(first.get_positions(), second.get_positions());

    // Best-cost bookkeeping is monotone: the reported best is never
    // worse than what a fresh evaluation of the restored placement says.
    let stats = first.get_statistics();
    assert_eq!(stats.final_cost, cost_a);
    assert!(stats.acceptance_rate <= 1.0);

    // The recommendation thresholds route this small design to the
    // force-directed placer unless timing-critical.
    assert_eq!(
        OptimizerFactory::recommend_algorithm(6, 2, false),
        AlgorithmType::ForceDirected
    );
    assert_eq!(
        OptimizerFactory::recommend_algorithm(6, 2, true),
        AlgorithmType::TimingDriven
    );
}

#[test]
fn force_directed_placer_shares_the_data_model() {
    init_logging();
    let mut placer = OptimizerFactory::create_force_directed_placer(
        Rectangle::new(0.0, 0.0, 200.0, 200.0),
    );
    for (name, x, y) in [("a", 20.0, 100.0), ("b", 180.0, 100.0), ("c", 100.0, 20.0)] {
        let mut comp = Component::new(name, Rectangle::new(0.0, 0.0, 4.0, 4.0));
        comp.position = Point::new(x, y);
        placer.add_component(comp);
    }
    let mut net = Net::new("tri", "a", "out");
    net.add_sink("b", "in");
    net.add_sink("c", "in");
    placer.add_net(net);

    let spread_before: float = placer
        .positions()
        .iter()
        .map(|p| p.distance_to(Point::new(100.0, 73.0)))
        .sum();
    placer.optimize(3_000);
    let spread_after: float = placer
        .positions()
        .iter()
        .map(|p| p.distance_to(Point::new(100.0, 73.0)))
        .sum();
    assert!(spread_after < spread_before);
}
