//! Force-directed placer: models nets as springs pulling connected
//! components together, pairwise inverse-square repulsion pushing them
//! apart, and a linear restoring force at the placement-area boundary.
//! Positions integrate with damped velocities until everything settles.

use crate::*;

const DEFAULT_SPRING_CONSTANT: float = 1.0;
const DEFAULT_REPULSION_CONSTANT: float = 1000.0;
const DEFAULT_DAMPING_FACTOR: float = 0.9;
const DEFAULT_TIME_STEP: float = 0.01;
const BOUNDARY_STRENGTH: float = 100.0;

/// Per-axis velocity magnitude below which a component counts as settled.
const CONVERGENCE_VELOCITY: float = 0.1;

pub struct ForceDirectedPlacer {
    components: Vec<Component>,
    nets: Vec<Net>,
    placement_area: Rectangle,

    pub spring_constant: float,
    pub repulsion_constant: float,
    pub damping_factor: float,
    pub time_step: float,
}

impl ForceDirectedPlacer {
    pub fn new(placement_area: Rectangle) -> Self {
        Self {
            components: Vec::new(),
            nets: Vec::new(),
            placement_area,
            spring_constant: DEFAULT_SPRING_CONSTANT,
            repulsion_constant: DEFAULT_REPULSION_CONSTANT,
            damping_factor: DEFAULT_DAMPING_FACTOR,
            time_step: DEFAULT_TIME_STEP,
        }
    }

    pub fn add_component(&mut self, component: Component) {
        self.components.push(component);
    }

    pub fn add_net(&mut self, net: Net) {
        self.nets.push(net);
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn positions(&self) -> Vec<Point> {
        self.components.iter().map(|c| c.position).collect()
    }

    /// Iterate until every movable component's velocity drops below the
    /// convergence threshold on both axes, or `max_iterations` passes.
    /// Returns whether the system converged.
    pub fn optimize(&mut self, max_iterations: usize) -> bool {
        let mut velocities = vec![Point::default(); self.components.len()];

        for iteration in 0..max_iterations {
            let mut converged = true;

            for i in 0..self.components.len() {
                if self.components[i].is_fixed {
                    continue;
                }
                let comp = &self.components[i];
                let force = self.net_force(comp) + self.repulsion_force(comp)
                    + self.boundary_force(comp);

                velocities[i] = velocities[i] * self.damping_factor + force * self.time_step;
                self.components[i].position += velocities[i] * self.time_step;

                if velocities[i].x.abs() > CONVERGENCE_VELOCITY
                    || velocities[i].y.abs() > CONVERGENCE_VELOCITY
                {
                    converged = false;
                }
            }

            if converged {
                debug!("force-directed placement converged at iteration {iteration}");
                return true;
            }
        }
        debug!("force-directed placement stopped at the iteration cap");
        false
    }

    /// Spring pull toward the centroid of the other components on each
    /// net touching `comp`, scaled by the net weight.
    fn net_force(&self, comp: &Component) -> Point {
        let mut force = Point::default();
        for net in &self.nets {
            if !net_touches(net, &comp.name) {
                continue;
            }
            let mut centroid = Point::default();
            let mut connected = 0;
            for other in &self.components {
                if other.name == comp.name || !net_touches(net, &other.name) {
                    continue;
                }
                centroid += other.position;
                connected += 1;
            }
            if connected > 0 {
                centroid = Point::new(
                    centroid.x / connected as float,
                    centroid.y / connected as float,
                );
                force += (centroid - comp.position) * (self.spring_constant * net.weight);
            }
        }
        force
    }

    /// Inverse-square repulsion away from every other component.
    fn repulsion_force(&self, comp: &Component) -> Point {
        let mut force = Point::default();
        for other in &self.components {
            if other.name == comp.name {
                continue;
            }
            let away = comp.position - other.position;
            let distance_sq = away.magnitude_squared();
            if distance_sq > 0.0 {
                let distance = distance_sq.sqrt();
                let repulsion = self.repulsion_constant / distance_sq;
                force += away * (repulsion / distance);
            }
        }
        force
    }

    /// Linear push back inside for each violated boundary edge.
    fn boundary_force(&self, comp: &Component) -> Point {
        let mut force = Point::default();
        let left = comp.position.x - self.placement_area.x;
        let right = self.placement_area.right() - (comp.position.x + comp.shape.width);
        let bottom = comp.position.y - self.placement_area.y;
        let top = self.placement_area.top() - (comp.position.y + comp.shape.height);

        if left < 0.0 {
            force.x += BOUNDARY_STRENGTH * -left;
        }
        if right < 0.0 {
            force.x -= BOUNDARY_STRENGTH * -right;
        }
        if bottom < 0.0 {
            force.y += BOUNDARY_STRENGTH * -bottom;
        }
        if top < 0.0 {
            force.y -= BOUNDARY_STRENGTH * -top;
        }
        force
    }
}

fn net_touches(net: &Net, component_name: &str) -> bool {
    net.driver_component == component_name
        || net.sinks.iter().any(|(sink, _)| sink == component_name)
}
