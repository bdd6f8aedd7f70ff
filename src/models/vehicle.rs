//! Vehicle type with capacity, depot, time window, and cost parameters.

use crate::amount::Amount;
use crate::models::job::TimeWindow;

/// A vehicle that services routes in a routing problem (spec §3).
///
/// # Examples
///
/// ```
/// use routecraft::amount::Amount;
/// use routecraft::models::Vehicle;
///
/// let v = Vehicle::new(0, Amount::new(vec![200]));
/// assert_eq!(v.id(), 0);
/// assert_eq!(v.capacity().values(), &[200]);
/// ```
#[derive(Debug, Clone)]
pub struct Vehicle {
    id: usize,
    capacity: Amount,
    start_location: Option<usize>,
    end_location: Option<usize>,
    skills: Vec<u32>,
    time_window: Option<TimeWindow>,
    fixed_cost: f64,
    cost_per_distance: f64,
    cost_per_duration: f64,
    vehicle_type: usize,
}

impl Vehicle {
    /// Creates a vehicle with the given ID and capacity.
    ///
    /// Defaults: no start/end location, no time window, zero fixed cost,
    /// `cost_per_distance = 1.0`, `cost_per_duration = 0.0`, `vehicle_type = 0`.
    pub fn new(id: usize, capacity: Amount) -> Self {
        Self {
            id,
            capacity,
            start_location: None,
            end_location: None,
            skills: Vec::new(),
            time_window: None,
            fixed_cost: 0.0,
            cost_per_distance: 1.0,
            cost_per_duration: 0.0,
            vehicle_type: 0,
        }
    }

    /// Sets both start and end location to the same depot.
    pub fn with_depot(mut self, location: usize) -> Self {
        self.start_location = Some(location);
        self.end_location = Some(location);
        self
    }

    /// Sets distinct start/end locations (open routes).
    pub fn with_start_end(mut self, start: usize, end: usize) -> Self {
        self.start_location = Some(start);
        self.end_location = Some(end);
        self
    }

    /// Sets the vehicle's operating time window.
    pub fn with_time_window(mut self, tw: TimeWindow) -> Self {
        self.time_window = Some(tw);
        self
    }

    /// Sets the skill set this vehicle offers.
    pub fn with_skills(mut self, skills: impl Into<Vec<u32>>) -> Self {
        self.skills = skills.into();
        self
    }

    /// Sets the fixed cost incurred when this vehicle is used at all.
    pub fn with_fixed_cost(mut self, cost: f64) -> Self {
        self.fixed_cost = cost;
        self
    }

    /// Sets cost per unit distance traveled.
    pub fn with_cost_per_distance(mut self, cost: f64) -> Self {
        self.cost_per_distance = cost;
        self
    }

    /// Sets cost per unit duration elapsed.
    pub fn with_cost_per_duration(mut self, cost: f64) -> Self {
        self.cost_per_duration = cost;
        self
    }

    /// Sets the vehicle type tag used to select a distance matrix.
    pub fn with_vehicle_type(mut self, vehicle_type: usize) -> Self {
        self.vehicle_type = vehicle_type;
        self
    }

    /// Vehicle rank.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Maximum load capacity.
    pub fn capacity(&self) -> &Amount {
        &self.capacity
    }

    /// Start location, if any.
    pub fn start_location(&self) -> Option<usize> {
        self.start_location
    }

    /// End location, if any.
    pub fn end_location(&self) -> Option<usize> {
        self.end_location
    }

    /// Skill set this vehicle offers.
    pub fn skills(&self) -> &[u32] {
        &self.skills
    }

    /// Operating time window, if any.
    pub fn time_window(&self) -> Option<&TimeWindow> {
        self.time_window.as_ref()
    }

    /// Fixed cost for using this vehicle.
    pub fn fixed_cost(&self) -> f64 {
        self.fixed_cost
    }

    /// Cost per unit distance.
    pub fn cost_per_distance(&self) -> f64 {
        self.cost_per_distance
    }

    /// Cost per unit duration.
    pub fn cost_per_duration(&self) -> f64 {
        self.cost_per_duration
    }

    /// Vehicle type, used to select a distance matrix.
    pub fn vehicle_type(&self) -> usize {
        self.vehicle_type
    }

    /// Returns `true` if this vehicle's skills cover the required set.
    pub fn has_skills(&self, required: &[u32]) -> bool {
        required.iter().all(|r| self.skills.contains(r))
    }
}
