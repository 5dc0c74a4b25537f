use std::fmt;
use std::str;
use std::thread;
use std::time::{
	Duration,
	Instant,
};

/// Shortest bit period the cards are known to follow (250 kHz)
pub const MIN_PERIOD: Duration = Duration::from_micros(4);
/// Longest bit period; slower clocks risk the card timing out the transaction
pub const MAX_PERIOD: Duration = Duration::from_micros(1000);
pub const DEFAULT_PERIOD: Duration = Duration::from_micros(32);

const DEFAULT_SLACK: Duration = Duration::from_micros(100);

pub fn reliable_sleep(mut duration: Duration) {
	loop {
		let now = Instant::now();
		thread::sleep(duration);
		let elapsed = now.elapsed();
		if elapsed >= duration {
			return;
		}
		duration -= elapsed;
	}
}

fn spin_until(deadline: Instant) {
	while Instant::now() < deadline {
		std::hint::spin_loop();
	}
}

/// Clock timing of the bus, derived from the full bit period `T`
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Timing {
	period: Duration,
}

impl Timing {
	pub fn new(period: Duration) -> crate::AResult<Self> {
		ensure!(period >= MIN_PERIOD && period <= MAX_PERIOD,
			"bit period {:?} outside of supported range {:?}..={:?}", period, MIN_PERIOD, MAX_PERIOD
		);
		Ok(Timing { period })
	}

	pub fn from_micros(micros: u64) -> crate::AResult<Self> {
		Timing::new(Duration::from_micros(micros))
	}

	pub fn period(&self) -> Duration {
		self.period
	}

	// CLK low and CLK high phase
	pub fn half_period(&self) -> Duration {
		self.period / 2
	}

	// settle delay after SEL and after each byte
	pub fn quarter_period(&self) -> Duration {
		self.period / 4
	}

	/// Nominal duration of a transaction exchanging `bytes` bytes
	///
	/// Cannot overflow: even `u32::MAX` bytes at `MAX_PERIOD` stay far below
	/// `Duration::MAX`.
	pub fn transaction_duration(&self, bytes: u32) -> Duration {
		let byte = self.half_period() * 16 + self.quarter_period();
		self.quarter_period() + byte * bytes
	}
}

impl Default for Timing {
	fn default() -> Self {
		Timing { period: DEFAULT_PERIOD }
	}
}

/// How to wait for the (sub-millisecond) clock phases
///
/// `thread::sleep` usually overshoots by tens of microseconds on a stock
/// kernel; spinning is exact but burns a core.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum DelayStrategy {
	Sleep,
	Spin,
	/// sleep until only `slack` is left, spin for the rest
	Hybrid {
		slack: Duration,
	},
}

impl DelayStrategy {
	pub fn wait(self, duration: Duration) {
		match self {
			DelayStrategy::Sleep => reliable_sleep(duration),
			DelayStrategy::Spin => spin_until(Instant::now() + duration),
			DelayStrategy::Hybrid { slack } => {
				let deadline = Instant::now() + duration;
				if duration > slack {
					reliable_sleep(duration - slack);
				}
				spin_until(deadline);
			},
		}
	}
}

impl Default for DelayStrategy {
	fn default() -> Self {
		DelayStrategy::Hybrid { slack: DEFAULT_SLACK }
	}
}

impl fmt::Display for DelayStrategy {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			DelayStrategy::Sleep => write!(f, "sleep"),
			DelayStrategy::Spin => write!(f, "spin"),
			DelayStrategy::Hybrid { slack } => write!(f, "hybrid:{}", slack.as_micros()),
		}
	}
}

impl str::FromStr for DelayStrategy {
	type Err = ::failure::Error;

	// sleep, spin, hybrid or hybrid:<slack in microseconds>
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let mut parts = s.splitn(2, ':');
		let name = parts.next().unwrap_or("");
		match (name, parts.next()) {
			("sleep", None) => Ok(DelayStrategy::Sleep),
			("spin", None) => Ok(DelayStrategy::Spin),
			("hybrid", None) => Ok(DelayStrategy::default()),
			("hybrid", Some(slack_s)) => {
				let slack = with_context!(("invalid hybrid slack: {:?}", slack_s),
					slack_s.parse::<u64>().map_err(|e| e.into())
				)?;
				Ok(DelayStrategy::Hybrid { slack: Duration::from_micros(slack) })
			},
			_ => bail!("unknown delay strategy {:?} (expected sleep, spin or hybrid[:SLACK])", s),
		}
	}
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum OutLine {
	Select,
	Clock,
	Command,
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum InLine {
	Data,
	Acknowledge,
}

/// Lines connected to the card; `true` is HIGH
pub trait Hardware {
	fn set_line(&mut self, line: OutLine, high: bool);
	fn read_line(&mut self, line: InLine) -> bool;

	fn timing(&self) -> Timing;

	// block for (at least) `duration`
	fn delay(&mut self, duration: Duration) {
		reliable_sleep(duration);
	}
}

#[cfg(test)]
mod test {
	use std::time::{
		Duration,
		Instant,
	};

	use super::{
		DelayStrategy,
		MAX_PERIOD,
		Timing,
	};

	#[test]
	fn timing_range() {
		assert!(Timing::from_micros(3).is_err());
		assert!(Timing::from_micros(1001).is_err());
		assert!(Timing::from_micros(0).is_err());
		assert_eq!(Timing::from_micros(4).unwrap().period(), Duration::from_micros(4));
		assert_eq!(Timing::from_micros(1000).unwrap().period(), Duration::from_micros(1000));
		assert_eq!(Timing::default().period(), Duration::from_micros(32));
	}

	#[test]
	fn timing_phases() {
		let t = Timing::from_micros(32).unwrap();
		assert_eq!(t.half_period(), Duration::from_micros(16));
		assert_eq!(t.quarter_period(), Duration::from_micros(8));

		let t = Timing::from_micros(5).unwrap();
		assert_eq!(t.half_period(), Duration::from_nanos(2500));
		assert_eq!(t.quarter_period(), Duration::from_nanos(1250));
	}

	#[test]
	fn transaction_duration() {
		let t = Timing::from_micros(32).unwrap();
		assert_eq!(t.transaction_duration(0), Duration::from_micros(8));
		// 8 + 11 * (8 * 32 + 8)
		assert_eq!(t.transaction_duration(11), Duration::from_micros(2912));

		let t = Timing::new(MAX_PERIOD).unwrap();
		// (8 * 1000 + 250) us per byte
		assert_eq!(t.transaction_duration(u32::MAX), Duration::from_micros(250) + Duration::from_micros(8250) * u32::MAX);
	}

	fn check_strategy(repr: &str, expected: DelayStrategy) {
		match repr.parse::<DelayStrategy>() {
			Err(e) => panic!("{} failed to parse as DelayStrategy: {}", repr, e),
			Ok(s) => assert_eq!(expected, s, "failed validating parsed {}", repr),
		}
	}

	#[test]
	fn parse_delay_strategy() {
		check_strategy("sleep", DelayStrategy::Sleep);
		check_strategy("spin", DelayStrategy::Spin);
		check_strategy("hybrid", DelayStrategy::default());
		check_strategy("hybrid:250", DelayStrategy::Hybrid { slack: Duration::from_micros(250) });
		check_strategy("hybrid:0", DelayStrategy::Hybrid { slack: Duration::from_micros(0) });
		for invalid in &["", "Spin", "spin:5", "hybrid:", "hybrid:x", "sleep:1", "busy"] {
			assert!(invalid.parse::<DelayStrategy>().is_err(), "{:?} must not be a valid delay strategy", invalid);
		}
	}

	#[test]
	fn delay_strategy_display_roundtrips() {
		for s in &[DelayStrategy::Sleep, DelayStrategy::Spin, DelayStrategy::default()] {
			check_strategy(&s.to_string(), *s);
		}
	}

	#[test]
	fn delays_wait_at_least_requested() {
		let requested = Duration::from_micros(300);
		for s in &[DelayStrategy::Sleep, DelayStrategy::Spin, DelayStrategy::Hybrid { slack: Duration::from_micros(100) }] {
			let start = Instant::now();
			s.wait(requested);
			assert!(start.elapsed() >= requested, "{} returned early", s);
		}
	}
}
