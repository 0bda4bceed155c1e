use crate::*;

/// Circuit component positional record. The shape rectangle describes the
/// footprint at the origin; `position` is the placed minimum corner. Only
/// `position` mutates during optimization.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    pub name: String,
    pub shape: Rectangle,
    pub position: Point,
    pub power_consumption: float,
    pub is_fixed: bool,
    pub input_pins: Vec<String>,
    pub output_pins: Vec<String>,
}

impl Component {
    pub fn new(name: impl Into<String>, shape: Rectangle) -> Self {
        Self {
            name: name.into(),
            shape,
            position: Point::default(),
            power_consumption: 0.0,
            is_fixed: false,
            input_pins: Vec::new(),
            output_pins: Vec::new(),
        }
    }

    /// Footprint at the current position.
    pub fn placed_rect(&self) -> Rectangle {
        Rectangle::new(
            self.position.x,
            self.position.y,
            self.shape.width,
            self.shape.height,
        )
    }
}

/// Electrical connection from one driver pin to one or more sink pins.
/// Criticality in [0, 1] marks timing importance; weight scales the
/// wirelength objective.
#[derive(Debug, Clone, PartialEq, new)]
pub struct Net {
    #[new(into)]
    pub name: String,
    #[new(into)]
    pub driver_component: String,
    #[new(into)]
    pub driver_pin: String,
    #[new(default)]
    pub sinks: Vec<(String, String)>,
    #[new(value = "0.0")]
    pub criticality: float,
    #[new(value = "1.0")]
    pub weight: float,
}

impl Net {
    pub fn add_sink(&mut self, component: impl Into<String>, pin: impl Into<String>) {
        self.sinks.push((component.into(), pin.into()));
    }
}

/// Optimization objectives, constraints and annealing schedule.
#[derive(Debug, Clone, Builder)]
pub struct OptimizationConfig {
    // Objective weights
    #[builder(default = 0.3)]
    pub area_weight: float,
    #[builder(default = 0.4)]
    pub wirelength_weight: float,
    #[builder(default = 0.2)]
    pub timing_weight: float,
    #[builder(default = 0.1)]
    pub power_weight: float,

    // Constraints
    #[builder(default = 0.8)]
    pub max_utilization: float,
    #[builder(default = 0.15)]
    pub min_spacing: float,
    #[builder(default = 2.0)]
    pub max_aspect_ratio: float,

    // Annealing schedule
    #[builder(default = 1000.0)]
    pub initial_temperature: float,
    #[builder(default = 0.95)]
    pub cooling_rate: float,
    #[builder(default = 0.1)]
    pub final_temperature: float,
    #[builder(default = 100_000)]
    pub max_iterations: usize,

    // Multi-level optimization
    #[builder(default = true)]
    pub enable_hierarchical: bool,
    #[builder(default = 10_000)]
    pub max_components_per_block: usize,
}

impl Default for OptimizationConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Cost breakdown of one placement evaluation.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct CostResult {
    pub total_cost: float,
    pub area_cost: float,
    pub wirelength_cost: float,
    pub timing_cost: float,
    pub power_cost: float,
    pub constraint_violations: float,
}

impl CostResult {
    pub fn is_feasible(&self) -> bool {
        self.constraint_violations < FEASIBILITY_TOLERANCE
    }
}

/// Counters from one annealing run.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct OptimizerStatistics {
    pub total_moves: usize,
    pub accepted_moves: usize,
    pub improved_moves: usize,
    pub acceptance_rate: float,
    pub improvement_rate: float,
    pub final_cost: CostResult,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlgorithmType {
    SimulatedAnnealing,
    ForceDirected,
    Hierarchical,
    Analytical,
    TimingDriven,
}

pub struct OptimizerFactory;

impl OptimizerFactory {
    pub fn create_sa_optimizer(
        area: Rectangle,
        config: OptimizationConfig,
    ) -> SimulatedAnnealingOptimizer {
        SimulatedAnnealingOptimizer::new(area, config)
    }

    pub fn create_force_directed_placer(area: Rectangle) -> ForceDirectedPlacer {
        ForceDirectedPlacer::new(area)
    }

    /// Pick an algorithm from the problem shape: huge designs go
    /// hierarchical, timing-critical ones timing-driven, mid-size ones to
    /// annealing, and small ones to the force-directed placer.
    pub fn recommend_algorithm(
        component_count: usize,
        _net_count: usize,
        timing_critical: bool,
    ) -> AlgorithmType {
        if component_count > 100_000 {
            AlgorithmType::Hierarchical
        } else if timing_critical {
            AlgorithmType::TimingDriven
        } else if component_count > 1_000 {
            AlgorithmType::SimulatedAnnealing
        } else {
            AlgorithmType::ForceDirected
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_record() {
        let mut comp = Component::new("alu0", Rectangle::new(0.0, 0.0, 4.0, 2.0));
        assert!(!comp.is_fixed);
        assert_eq!(comp.position, Point::new(0.0, 0.0));

        comp.position = Point::new(10.0, 20.0);
        assert_eq!(comp.placed_rect(), Rectangle::new(10.0, 20.0, 4.0, 2.0));
    }

    #[test]
    fn test_net_defaults() {
        let mut net = Net::new("clk", "driver0", "out");
        assert_eq!(net.criticality, 0.0);
        assert_eq!(net.weight, 1.0);
        net.add_sink("sink0", "in");
        net.add_sink("sink1", "in");
        assert_eq!(net.sinks.len(), 2);
    }

    #[test]
    fn test_config_defaults_and_builder() {
        let config = OptimizationConfig::default();
        assert_eq!(config.wirelength_weight, 0.4);
        assert_eq!(config.initial_temperature, 1000.0);
        assert_eq!(config.cooling_rate, 0.95);
        assert_eq!(config.max_iterations, 100_000);

        let custom = OptimizationConfig::builder()
            .min_spacing(0.5)
            .max_iterations(500)
            .build();
        assert_eq!(custom.min_spacing, 0.5);
        assert_eq!(custom.max_iterations, 500);
        assert_eq!(custom.final_temperature, 0.1);
    }

    #[test]
    fn test_cost_feasibility_threshold() {
        let mut cost = CostResult::default();
        assert!(cost.is_feasible());
        cost.constraint_violations = 1e-7;
        assert!(cost.is_feasible());
        cost.constraint_violations = 0.5;
        assert!(!cost.is_feasible());
    }

    #[test]
    fn test_recommend_algorithm_thresholds() {
        use AlgorithmType::*;
        assert_eq!(OptimizerFactory::recommend_algorithm(200_000, 10, false), Hierarchical);
        assert_eq!(OptimizerFactory::recommend_algorithm(200_000, 10, true), Hierarchical);
        assert_eq!(OptimizerFactory::recommend_algorithm(50_000, 10, true), TimingDriven);
        assert_eq!(OptimizerFactory::recommend_algorithm(50_000, 10, false), SimulatedAnnealing);
        assert_eq!(OptimizerFactory::recommend_algorithm(500, 10, false), ForceDirected);
    }
}
