//! Job and time-window types.

use crate::amount::Amount;

/// A time window constraint for service at a job's location.
///
/// The vehicle must arrive no later than `due` and may arrive as early as
/// `ready` (waiting is allowed if early).
///
/// # Examples
///
/// ```
/// use routecraft::models::TimeWindow;
///
/// let tw = TimeWindow::new(100, 200).unwrap();
/// assert!(tw.ready() <= tw.due());
/// assert!(tw.contains(150));
/// assert!(!tw.contains(250));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    ready: i64,
    due: i64,
}

impl TimeWindow {
    /// Creates a new time window.
    ///
    /// Returns `None` if `ready > due`.
    pub fn new(ready: i64, due: i64) -> Option<Self> {
        if ready > due {
            return None;
        }
        Some(Self { ready, due })
    }

    /// Earliest allowable service start.
    pub fn ready(&self) -> i64 {
        self.ready
    }

    /// Latest allowable service start.
    pub fn due(&self) -> i64 {
        self.due
    }

    /// Returns `true` if the given time falls within this window.
    pub fn contains(&self, time: i64) -> bool {
        time >= self.ready && time <= self.due
    }

    /// Returns the waiting time incurred if arriving at the given time.
    ///
    /// Zero if the vehicle arrives within or after the window opens.
    pub fn waiting_time(&self, arrival: i64) -> i64 {
        (self.ready - arrival).max(0)
    }

    /// Returns `true` if arriving at the given time violates this window.
    pub fn is_violated(&self, arrival: i64) -> bool {
        arrival > self.due
    }

    /// Service start time given an arrival: `max(arrival, ready)`, or `None`
    /// if arrival is already past `due`.
    pub fn service_start(&self, arrival: i64) -> Option<i64> {
        if self.is_violated(arrival) {
            None
        } else {
            Some(arrival.max(self.ready))
        }
    }
}

/// The role a job plays with respect to vehicle load (spec §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobType {
    /// Contributes both a pickup and a delivery amount at the same stop.
    Single,
    /// The pickup half of a pickup/delivery pair; `pair` names the partner's rank.
    Pickup {
        /// Rank of the paired delivery job.
        pair: usize,
    },
    /// The delivery half of a pickup/delivery pair; `pair` names the partner's rank.
    Delivery {
        /// Rank of the paired pickup job.
        pair: usize,
    },
}

/// A task to perform at a location, with demand, optional time windows,
/// required skills, and a priority (spec §3).
#[derive(Debug, Clone)]
pub struct Job {
    id: usize,
    location: usize,
    service_duration: i64,
    pickup: Amount,
    delivery: Amount,
    time_windows: Vec<TimeWindow>,
    skills: Vec<u32>,
    priority: u8,
    job_type: JobType,
}

impl Job {
    /// Creates a new Single job with the given pickup/delivery demand.
    pub fn new(id: usize, location: usize, pickup: Amount, delivery: Amount) -> Self {
        Self {
            id,
            location,
            service_duration: 0,
            pickup,
            delivery,
            time_windows: Vec::new(),
            skills: Vec::new(),
            priority: 0,
            job_type: JobType::Single,
        }
    }

    /// Sets the service duration.
    pub fn with_service_duration(mut self, duration: i64) -> Self {
        self.service_duration = duration;
        self
    }

    /// Adds a feasible time window (multiple windows are allowed; the
    /// engine picks the earliest feasible one, spec §4.3).
    pub fn with_time_window(mut self, tw: TimeWindow) -> Self {
        self.time_windows.push(tw);
        self
    }

    /// Sets the required skill set.
    pub fn with_skills(mut self, skills: impl Into<Vec<u32>>) -> Self {
        self.skills = skills.into();
        self
    }

    /// Sets the priority (higher is more important; aggregated into
    /// `SolutionIndicators::total_priority`).
    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = priority;
        self
    }

    /// Marks this job as the pickup half of a pair.
    pub fn as_pickup_of(mut self, delivery_rank: usize) -> Self {
        self.job_type = JobType::Pickup { pair: delivery_rank };
        self
    }

    /// Marks this job as the delivery half of a pair.
    pub fn as_delivery_of(mut self, pickup_rank: usize) -> Self {
        self.job_type = JobType::Delivery { pair: pickup_rank };
        self
    }

    /// Job rank.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Location index into the distance matrix.
    pub fn location(&self) -> usize {
        self.location
    }

    /// Service duration at this job.
    pub fn service_duration(&self) -> i64 {
        self.service_duration
    }

    /// Pickup amount (loaded at this stop, if Single or Pickup).
    pub fn pickup(&self) -> &Amount {
        &self.pickup
    }

    /// Delivery amount (offloaded at this stop, if Single or Delivery).
    pub fn delivery(&self) -> &Amount {
        &self.delivery
    }

    /// Declared time windows, in no particular order.
    pub fn time_windows(&self) -> &[TimeWindow] {
        &self.time_windows
    }

    /// Required skill set.
    pub fn skills(&self) -> &[u32] {
        &self.skills
    }

    /// Priority.
    pub fn priority(&self) -> u8 {
        self.priority
    }

    /// Job type tag.
    pub fn job_type(&self) -> JobType {
        self.job_type
    }

    /// Earliest feasible service start for an arrival, across all declared
    /// windows (spec §4.3). `None` if no window is declared (unconstrained)
    /// returns the arrival time itself; `Some(None)`-shaped callers should
    /// check `time_windows().is_empty()` first if they need to distinguish.
    pub fn best_service_start(&self, arrival: i64) -> Option<i64> {
        if self.time_windows.is_empty() {
            return Some(arrival);
        }
        self.time_windows
            .iter()
            .filter_map(|tw| tw.service_start(arrival))
            .min()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_window_valid() {
        let tw = TimeWindow::new(10, 20).expect("valid");
        assert_eq!(tw.ready(), 10);
        assert_eq!(tw.due(), 20);
    }

    #[test]
    fn test_time_window_invalid() {
        assert!(TimeWindow::new(20, 10).is_none());
    }

    #[test]
    fn test_time_window_contains() {
        let tw = TimeWindow::new(10, 20).expect("valid");
        assert!(tw.contains(10));
        assert!(tw.contains(20));
        assert!(!tw.contains(9));
        assert!(!tw.contains(21));
    }

    #[test]
    fn test_time_window_waiting() {
        let tw = TimeWindow::new(10, 20).expect("valid");
        assert_eq!(tw.waiting_time(5), 5);
        assert_eq!(tw.waiting_time(10), 0);
        assert_eq!(tw.waiting_time(15), 0);
    }

    #[test]
    fn test_service_start() {
        let tw = TimeWindow::new(10, 20).expect("valid");
        assert_eq!(tw.service_start(5), Some(10));
        assert_eq!(tw.service_start(15), Some(15));
        assert_eq!(tw.service_start(21), None);
    }

    #[test]
    fn test_job_single() {
        let job = Job::new(1, 3, Amount::new(vec![5]), Amount::new(vec![2]))
            .with_service_duration(10)
            .with_priority(3);
        assert_eq!(job.id(), 1);
        assert_eq!(job.location(), 3);
        assert_eq!(job.service_duration(), 10);
        assert_eq!(job.pickup().values(), &[5]);
        assert_eq!(job.delivery().values(), &[2]);
        assert_eq!(job.priority(), 3);
        assert!(matches!(job.job_type(), JobType::Single));
    }

    #[test]
    fn test_job_pair() {
        let pickup = Job::new(1, 1, Amount::new(vec![5]), Amount::zero(1)).as_pickup_of(2);
        let delivery = Job::new(2, 2, Amount::zero(1), Amount::new(vec![5])).as_delivery_of(1);
        assert!(matches!(pickup.job_type(), JobType::Pickup { pair: 2 }));
        assert!(matches!(delivery.job_type(), JobType::Delivery { pair: 1 }));
    }

    #[test]
    fn test_best_service_start_multiple_windows() {
        let job = Job::new(1, 1, Amount::zero(1), Amount::zero(1))
            .with_time_window(TimeWindow::new(50, 60).unwrap())
            .with_time_window(TimeWindow::new(10, 20).unwrap());
        // Arrival at 5: earliest feasible window is [10,20] -> service starts at 10
        assert_eq!(job.best_service_start(5), Some(10));
        // Arrival at 55: only [50,60] fits
        assert_eq!(job.best_service_start(55), Some(55));
        // Arrival at 25: neither window is still open
        assert_eq!(job.best_service_start(25), None);
    }

    #[test]
    fn test_best_service_start_unconstrained() {
        let job = Job::new(1, 1, Amount::zero(1), Amount::zero(1));
        assert_eq!(job.best_service_start(42), Some(42));
    }
}
