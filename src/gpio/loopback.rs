use std::time::Duration;

use crate::memcard::{
	DelayStrategy,
	Hardware,
	InLine,
	OutLine,
	Timing,
};

/// Software bus with DAT wired to CMD and ACK pulled up
///
/// Runs the real timing, so it is good for checking the host side without
/// a card connected: every byte sent comes back unchanged.
pub struct Loopback {
	timing: Timing,
	delay: DelayStrategy,
	command: bool,
}

impl Loopback {
	pub fn new(timing: Timing, delay: DelayStrategy) -> Self {
		Loopback {
			timing,
			delay,
			command: false,
		}
	}
}

impl Hardware for Loopback {
	fn set_line(&mut self, line: OutLine, high: bool) {
		if line == OutLine::Command {
			self.command = high;
		}
	}

	fn read_line(&mut self, line: InLine) -> bool {
		match line {
			InLine::Data => self.command,
			InLine::Acknowledge => true,
		}
	}

	fn timing(&self) -> Timing {
		self.timing
	}

	fn delay(&mut self, duration: Duration) {
		self.delay.wait(duration);
	}
}

#[cfg(test)]
mod test {
	use std::time::Instant;

	use super::Loopback;
	use crate::memcard::{
		Command,
		DelayStrategy,
		LowLevel,
		MemoryCardOperations,
		Timing,
	};

	#[test]
	fn echoes_identify() {
		let timing = Timing::from_micros(4).unwrap();
		let mut lines = Loopback::new(timing, DelayStrategy::Spin);

		let start = Instant::now();
		let response = lines.identify();
		assert!(start.elapsed() >= timing.transaction_duration(11));
		assert_eq!(response.into_bytes(), Command::Identify.bytes());
	}

	#[test]
	fn echoes_all_bytes() {
		let mut lines = Loopback::new(Timing::from_micros(4).unwrap(), DelayStrategy::Spin);
		let all: Vec<u8> = (0..=255u8).collect();
		assert_eq!(lines.exchange_bytes(&all), all);
	}
}
