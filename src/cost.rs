//! Placement cost model.
//!
//! Evaluates the quality of a placement from wirelength, timing, area and
//! power terms plus spacing / boundary constraint violations. The total
//! is the weighted sum the annealer minimizes, with a heavy fixed penalty
//! on violations so infeasible placements always lose to feasible ones.

use crate::*;

/// Violations below this threshold count as feasible.
pub const FEASIBILITY_TOLERANCE: float = 1e-6;

/// Per-unit penalty applied to constraint violations in the total cost.
const VIOLATION_PENALTY: float = 1000.0;

/// Flat penalty for a component outside the placement area.
const OUT_OF_AREA_PENALTY: float = 100.0;

/// Nets above this criticality contribute to the timing term.
const TIMING_CRITICALITY_CUTOFF: float = 0.8;

/// Cost evaluator over a component population and its nets. Dangling net
/// references (driver or sink naming an unregistered component) are
/// skipped during evaluation; [`CostModel::log_dangling_references`]
/// reports them once per run so the hot loop stays silent.
pub struct CostModel<'a> {
    config: &'a OptimizationConfig,
    placement_area: Rectangle,
}

impl<'a> CostModel<'a> {
    pub fn new(config: &'a OptimizationConfig, placement_area: Rectangle) -> Self {
        Self {
            config,
            placement_area,
        }
    }

    pub fn evaluate(
        &self,
        components: &[Component],
        component_index: &IndexMap<String, usize>,
        nets: &[Net],
    ) -> CostResult {
        let wirelength_cost = self.wirelength_cost(components, component_index, nets);
        let timing_cost = self.timing_cost(components, component_index, nets);
        let area_cost = self.area_cost(components);
        let power_cost = self.power_cost(components);
        let constraint_violations = self.constraint_violations(components);

        let total_cost = self.config.wirelength_weight * wirelength_cost
            + self.config.timing_weight * timing_cost
            + self.config.area_weight * area_cost
            + self.config.power_weight * power_cost
            + VIOLATION_PENALTY * constraint_violations;

        CostResult {
            total_cost,
            area_cost,
            wirelength_cost,
            timing_cost,
            power_cost,
            constraint_violations,
        }
    }

    /// Warn once about nets referencing unregistered components.
    pub fn log_dangling_references(
        &self,
        component_index: &IndexMap<String, usize>,
        nets: &[Net],
    ) {
        for net in nets {
            if !component_index.contains_key(&net.driver_component) {
                warn!(
                    "net '{}' driver '{}' is not a registered component; net will be skipped",
                    net.name, net.driver_component
                );
            }
            for (sink, _) in &net.sinks {
                if !component_index.contains_key(sink) {
                    warn!(
                        "net '{}' sink '{}' is not a registered component; sink will be skipped",
                        net.name, sink
                    );
                }
            }
        }
    }

    /// Sum over nets of driver-to-sink distances, scaled by net weight
    /// and `1 + criticality`.
    fn wirelength_cost(
        &self,
        components: &[Component],
        component_index: &IndexMap<String, usize>,
        nets: &[Net],
    ) -> float {
        let mut total = 0.0;
        for net in nets {
            let Some(&driver) = component_index.get(&net.driver_component) else {
                continue;
            };
            let driver_pos = components[driver].position;

            let mut net_wirelength = 0.0;
            for (sink, _) in &net.sinks {
                let Some(&sink_idx) = component_index.get(sink) else {
                    continue;
                };
                net_wirelength += driver_pos.distance_to(components[sink_idx].position);
            }
            total += net_wirelength * net.weight * (1.0 + net.criticality);
        }
        total
    }

    /// Quadratic distance penalty on critical nets only; non-critical
    /// nets contribute nothing.
    fn timing_cost(
        &self,
        components: &[Component],
        component_index: &IndexMap<String, usize>,
        nets: &[Net],
    ) -> float {
        let mut total = 0.0;
        for net in nets {
            if net.criticality <= TIMING_CRITICALITY_CUTOFF {
                continue;
            }
            let Some(&driver) = component_index.get(&net.driver_component) else {
                continue;
            };
            let driver_pos = components[driver].position;
            for (sink, _) in &net.sinks {
                let Some(&sink_idx) = component_index.get(sink) else {
                    continue;
                };
                let distance = driver_pos.distance_to(components[sink_idx].position);
                total += distance * distance * net.criticality;
            }
        }
        total
    }

    /// Excess of the placed bounding box over the placement area.
    fn area_cost(&self, components: &[Component]) -> float {
        if components.is_empty() {
            return 0.0;
        }
        let footprints: Vec<Rectangle> = components.iter().map(Component::placed_rect).collect();
        let bbox = Rectangle::bounding_box_of_rectangles(&footprints);
        (bbox.area() - self.placement_area.area()).max(0.0)
    }

    /// Hot-spot clustering penalty: close pairs of power-hungry
    /// components cost `p_i * p_j / (d + 1)`.
    fn power_cost(&self, components: &[Component]) -> float {
        let mut total = 0.0;
        for i in 0..components.len() {
            for j in (i + 1)..components.len() {
                let power_product =
                    components[i].power_consumption * components[j].power_consumption;
                if power_product <= 1e-3 {
                    continue;
                }
                let distance = components[i]
                    .placed_rect()
                    .center()
                    .distance_to(components[j].placed_rect().center());
                if distance < 10.0 {
                    total += power_product / (distance + 1.0);
                }
            }
        }
        total
    }

    /// Pairwise spacing shortfalls plus a flat penalty per component not
    /// fully inside the placement area.
    fn constraint_violations(&self, components: &[Component]) -> float {
        let mut violations = 0.0;
        for i in 0..components.len() {
            for j in (i + 1)..components.len() {
                let distance = components[i]
                    .placed_rect()
                    .distance_to(&components[j].placed_rect());
                if distance < self.config.min_spacing {
                    violations += self.config.min_spacing - distance;
                }
            }
        }
        for comp in components {
            if !self.placement_area.contains_rectangle(&comp.placed_rect()) {
                violations += OUT_OF_AREA_PENALTY;
            }
        }
        violations
    }
}
