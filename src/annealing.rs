//! Simulated-annealing placement optimizer.
//!
//! Classic move/accept/cool loop: perturb one movable component by a
//! temperature-scaled offset, accept improvements outright and
//! regressions with probability `exp(-delta / T)`, cool geometrically
//! every iteration, and keep the best placement ever seen. With a fixed
//! seed and a fixed registration order a run is bit-reproducible.

use crate::*;

/// How often the loop emits a progress line, in iterations.
const PROGRESS_INTERVAL: usize = 10_000;

pub struct SimulatedAnnealingOptimizer {
    components: Vec<Component>,
    component_index: IndexMap<String, usize>,
    nets: Vec<Net>,
    placement_area: Rectangle,
    config: OptimizationConfig,

    rng: StdRng,
    current_temperature: float,
    current_cost: CostResult,
    best_cost: CostResult,
    best_positions: Vec<Point>,

    total_moves: usize,
    accepted_moves: usize,
    improved_moves: usize,
}

impl SimulatedAnnealingOptimizer {
    pub fn new(placement_area: Rectangle, config: OptimizationConfig) -> Self {
        Self::with_rng(placement_area, config, StdRng::from_os_rng())
    }

    /// Deterministic variant: the same seed, component registration
    /// order, and config reproduce the identical trajectory.
    pub fn with_seed(placement_area: Rectangle, config: OptimizationConfig, seed: u64) -> Self {
        Self::with_rng(placement_area, config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(placement_area: Rectangle, config: OptimizationConfig, rng: StdRng) -> Self {
        let current_temperature = config.initial_temperature;
        Self {
            components: Vec::new(),
            component_index: IndexMap::default(),
            nets: Vec::new(),
            placement_area,
            config,
            rng,
            current_temperature,
            current_cost: CostResult::default(),
            best_cost: CostResult::default(),
            best_positions: Vec::new(),
            total_moves: 0,
            accepted_moves: 0,
            improved_moves: 0,
        }
    }

    pub fn add_component(&mut self, component: Component) {
        self.component_index
            .insert(component.name.clone(), self.components.len());
        self.components.push(component);
    }

    pub fn add_net(&mut self, net: Net) {
        self.nets.push(net);
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn placement_area(&self) -> Rectangle {
        self.placement_area
    }

    /// Best positions seen so far, in component registration order.
    pub fn get_positions(&self) -> Vec<Point> {
        self.best_positions.clone()
    }

    pub fn get_statistics(&self) -> OptimizerStatistics {
        let rate = |count: usize| {
            if self.total_moves > 0 {
                count as float / self.total_moves as float
            } else {
                0.0
            }
        };
        OptimizerStatistics {
            total_moves: self.total_moves,
            accepted_moves: self.accepted_moves,
            improved_moves: self.improved_moves,
            acceptance_rate: rate(self.accepted_moves),
            improvement_rate: rate(self.improved_moves),
            final_cost: self.best_cost,
        }
    }

    /// Run the annealing loop. Never fails: an infeasible result comes
    /// back with its feasibility flag down and the best placement seen is
    /// restored into the components. Re-running resets the statistics but
    /// keeps the configured problem.
    pub fn optimize(&mut self) -> CostResult {
        let _tmr = timer!(logging_timer::Level::Debug; "simulated_annealing");
        self.total_moves = 0;
        self.accepted_moves = 0;
        self.improved_moves = 0;

        {
            let model = CostModel::new(&self.config, self.placement_area);
            model.log_dangling_references(&self.component_index, &self.nets);
        }

        // Components still at the origin scatter uniformly over the
        // placement area before the loop starts.
        for i in 0..self.components.len() {
            if self.components[i].position == Point::new(0.0, 0.0) {
                let shape = self.components[i].shape;
                self.components[i].position = self.random_position(shape);
            }
        }

        self.best_positions = self.components.iter().map(|c| c.position).collect();
        self.current_cost = self.evaluate_cost();
        self.best_cost = self.current_cost;
        self.current_temperature = self.config.initial_temperature;

        info!(
            "annealing {} components, {} nets, initial cost {:.3}",
            self.components.len(),
            self.nets.len(),
            self.current_cost.total_cost
        );

        for iteration in 0..self.config.max_iterations {
            if let Some((index, old_position)) = self.propose_move() {
                let new_cost = self.evaluate_cost();
                let delta = new_cost.total_cost - self.current_cost.total_cost;
                self.total_moves += 1;

                if delta < 0.0 || self.accept_regression(delta) {
                    self.accepted_moves += 1;
                    self.current_cost = new_cost;
                    if new_cost.total_cost < self.best_cost.total_cost {
                        self.improved_moves += 1;
                        self.best_cost = new_cost;
                        for (slot, comp) in
                            self.best_positions.iter_mut().zip(&self.components)
                        {
                            *slot = comp.position;
                        }
                    }
                } else {
                    self.components[index].position = old_position;
                }
            }

            self.current_temperature *= self.config.cooling_rate;

            if iteration % PROGRESS_INTERVAL == 0 {
                debug!(
                    "iteration {iteration}: T={:.4}, cost={:.3}, accepted={}/{}",
                    self.current_temperature,
                    self.current_cost.total_cost,
                    self.accepted_moves,
                    self.total_moves
                );
            }

            if self.current_temperature < self.config.final_temperature {
                debug!("reached final temperature at iteration {iteration}");
                break;
            }
        }

        for (comp, position) in self.components.iter_mut().zip(&self.best_positions) {
            comp.position = *position;
        }

        info!(
            "annealing done: best cost {:.3}, feasible: {}",
            self.best_cost.total_cost,
            self.best_cost.is_feasible()
        );
        self.best_cost
    }

    fn evaluate_cost(&self) -> CostResult {
        CostModel::new(&self.config, self.placement_area).evaluate(
            &self.components,
            &self.component_index,
            &self.nets,
        )
    }

    /// Perturb one uniformly-chosen movable component by an offset drawn
    /// from `Uniform(-T, T)` per axis. A move that would push the shape
    /// outside the placement area fails and counts as a no-op; on success
    /// the old position comes back for rollback.
    fn propose_move(&mut self) -> Option<(usize, Point)> {
        let movable: Vec<usize> = (0..self.components.len())
            .filter(|&i| !self.components[i].is_fixed)
            .collect();
        if movable.is_empty() {
            return None;
        }
        let index = movable[self.rng.random_range(0..movable.len())];
        let old_position = self.components[index].position;

        let t = self.current_temperature;
        let offset = Point::new(
            self.rng.random_range(-t..=t),
            self.rng.random_range(-t..=t),
        );
        let candidate = old_position + offset;

        if !self.position_is_valid(index, candidate) {
            return None;
        }
        self.components[index].position = candidate;
        Some((index, old_position))
    }

    fn accept_regression(&mut self, delta: float) -> bool {
        if self.current_temperature <= 0.0 {
            return false;
        }
        let probability = (-delta / self.current_temperature).exp();
        self.rng.random_range(0.0..1.0) < probability
    }

    /// Uniform position within the placement area, shrunk so the shape
    /// stays fully inside.
    fn random_position(&mut self, shape: Rectangle) -> Point {
        let max_x = (self.placement_area.right() - shape.width).max(self.placement_area.x);
        let max_y = (self.placement_area.top() - shape.height).max(self.placement_area.y);
        Point::new(
            self.rng.random_range(self.placement_area.x..=max_x),
            self.rng.random_range(self.placement_area.y..=max_y),
        )
    }

    fn position_is_valid(&self, index: usize, position: Point) -> bool {
        let shape = self.components[index].shape;
        position.x >= self.placement_area.x
            && position.y >= self.placement_area.y
            && position.x + shape.width <= self.placement_area.right()
            && position.y + shape.height <= self.placement_area.top()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn optimizer(seed: u64, max_iterations: usize) -> SimulatedAnnealingOptimizer {
        let config = OptimizationConfig::builder()
            .max_iterations(max_iterations)
            .build();
        let mut sa = SimulatedAnnealingOptimizer::with_seed(
            Rectangle::new(0.0, 0.0, 100.0, 100.0),
            config,
            seed,
        );
        for i in 0..6 {
            let mut comp = Component::new(format!("core{i}"), Rectangle::new(0.0, 0.0, 4.0, 4.0));
            comp.power_consumption = 0.5;
            sa.add_component(comp);
        }
        for i in 0..5usize {
            let mut net = Net::new(format!("n{i}"), format!("core{i}"), "out");
            net.add_sink(format!("core{}", i + 1), "in");
            net.criticality = if i == 0 { 0.9 } else { 0.2 };
            sa.add_net(net);
        }
        sa
    }

    #[test]
    fn test_optimization_improves_cost() {
        let mut sa = optimizer(7, 2_000);
        let result = sa.optimize();
        let stats = sa.get_statistics();
        assert!(stats.total_moves > 0);
        assert!(stats.accepted_moves <= stats.total_moves);
        assert!(stats.improved_moves <= stats.accepted_moves);
        assert_eq!(stats.final_cost, result);
        // The restored placement re-evaluates to the reported best
        let restored = sa.evaluate_cost();
        assert!((restored.total_cost - result.total_cost).abs() < 1e-6);
    }

    #[test]
    fn test_determinism_with_fixed_seed() {
        let mut first = optimizer(42, 10_000);
        let mut second = optimizer(42, 10_000);
        let cost_a = first.optimize();
        let cost_b = second.optimize();

        assert_eq!(cost_a.total_cost, cost_b.total_cost);
        assert_eq!(first.get_positions(), second.get_positions());
        assert_eq!(
            first.get_statistics().total_moves,
            second.get_statistics().total_moves
        );

        // A different seed takes a different trajectory
        let mut third = optimizer(43, 10_000);
        let cost_c = third.optimize();
        assert_ne!(cost_a.total_cost, cost_c.total_cost);
    }

    #[test]
    fn test_best_cost_not_worse_than_initial() {
        let mut sa = optimizer(11, 3_000);
        // Evaluate the scattered starting placement by running a
        // zero-iteration pass first.
        let mut probe = optimizer(11, 0);
        let initial = probe.optimize();
        let best = sa.optimize();
        assert!(best.total_cost <= initial.total_cost);
    }

    #[test]
    fn test_fixed_components_never_move() {
        let config = OptimizationConfig::builder().max_iterations(500).build();
        let mut sa = SimulatedAnnealingOptimizer::with_seed(
            Rectangle::new(0.0, 0.0, 100.0, 100.0),
            config,
            3,
        );
        let mut pad = Component::new("pad", Rectangle::new(0.0, 0.0, 2.0, 2.0));
        pad.position = Point::new(1.0, 1.0);
        pad.is_fixed = true;
        sa.add_component(pad);

        let mut core = Component::new("core", Rectangle::new(0.0, 0.0, 4.0, 4.0));
        core.position = Point::new(50.0, 50.0);
        sa.add_component(core);

        sa.optimize();
        assert_eq!(sa.components()[0].position, Point::new(1.0, 1.0));
    }

    #[test]
    fn test_components_stay_inside_area() {
        let mut sa = optimizer(5, 2_000);
        sa.optimize();
        let area = sa.placement_area();
        for comp in sa.components() {
            assert!(area.contains_rectangle(&comp.placed_rect()), "{}", comp.name);
        }
    }

    #[test]
    fn test_rerun_preserves_problem() {
        let mut sa = optimizer(9, 1_000);
        let first = sa.optimize();
        let second = sa.optimize();
        assert_eq!(sa.components().len(), 6);
        // The second run starts from the first run's best placement, so
        // it can only hold or improve.
        assert!(second.total_cost <= first.total_cost + 1e-9);
    }

    #[test]
    fn test_no_movable_components() {
        let config = OptimizationConfig::builder().max_iterations(100).build();
        let mut sa = SimulatedAnnealingOptimizer::with_seed(
            Rectangle::new(0.0, 0.0, 10.0, 10.0),
            config,
            1,
        );
        let mut pad = Component::new("pad", Rectangle::new(0.0, 0.0, 1.0, 1.0));
        pad.position = Point::new(4.0, 4.0);
        pad.is_fixed = true;
        sa.add_component(pad);

        let result = sa.optimize();
        assert_eq!(sa.get_statistics().total_moves, 0);
        assert!(result.is_feasible());
    }
}
