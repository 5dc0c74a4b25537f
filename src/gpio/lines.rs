use std::time::Duration;

use super::{
	LineMap,
	Pin,
};

use crate::memcard::{
	DelayStrategy,
	Hardware,
	InLine,
	OutLine,
	Timing,
};

/// A GPIO configured as output; releases the pin when dropped
pub trait OutputLine {
	fn write(&mut self, high: bool);
}

/// A GPIO configured as input; releases the pin when dropped
pub trait InputLine {
	fn read(&mut self) -> bool;
}

/// Source of GPIO pins
pub trait PinBank {
	type Output: OutputLine;
	type Input: InputLine;

	fn claim_output(&mut self, pin: Pin, high: bool) -> crate::AResult<Self::Output>;
	fn claim_input(&mut self, pin: Pin) -> crate::AResult<Self::Input>;
}

/// Bus lines claimed from a `PinBank`
///
/// Claiming configures the pin directions with the bus idle (SEL and CLK
/// high, CMD low). Dropping parks the bus idle again, then drops the pins,
/// which hands each one back to the bank in the mode it had before.
pub struct GpioLines<O: OutputLine, I: InputLine> {
	select: O,
	clock: O,
	command: O,
	data: I,
	acknowledge: I,
	map: LineMap,
	timing: Timing,
	delay: DelayStrategy,
}

impl<O: OutputLine, I: InputLine> GpioLines<O, I> {
	pub fn claim<B>(bank: &mut B, map: LineMap, timing: Timing, delay: DelayStrategy) -> crate::AResult<Self>
	where
		B: PinBank<Output = O, Input = I>,
	{
		map.validate()?;

		let select = with_context!(("couldn't claim {} for SEL", map.select), bank.claim_output(map.select, true))?;
		let clock = with_context!(("couldn't claim {} for CLK", map.clock), bank.claim_output(map.clock, true))?;
		let command = with_context!(("couldn't claim {} for CMD", map.command), bank.claim_output(map.command, false))?;
		let data = with_context!(("couldn't claim {} for DAT", map.data), bank.claim_input(map.data))?;
		let acknowledge = with_context!(("couldn't claim {} for ACK", map.acknowledge), bank.claim_input(map.acknowledge))?;
		debug!("claimed lines {}", map);

		Ok(GpioLines {
			select,
			clock,
			command,
			data,
			acknowledge,
			map,
			timing,
			delay,
		})
	}

	fn output(&mut self, line: OutLine) -> &mut O {
		match line {
			OutLine::Select => &mut self.select,
			OutLine::Clock => &mut self.clock,
			OutLine::Command => &mut self.command,
		}
	}
}

impl<O: OutputLine, I: InputLine> Drop for GpioLines<O, I> {
	fn drop(&mut self) {
		self.select.write(true);
		self.clock.write(true);
		self.command.write(false);
		debug!("released lines {}", self.map);
	}
}

impl<O: OutputLine, I: InputLine> Hardware for GpioLines<O, I> {
	fn set_line(&mut self, line: OutLine, high: bool) {
		self.output(line).write(high);
	}

	fn read_line(&mut self, line: InLine) -> bool {
		match line {
			InLine::Data => self.data.read(),
			InLine::Acknowledge => self.acknowledge.read(),
		}
	}

	fn timing(&self) -> Timing {
		self.timing
	}

	fn delay(&mut self, duration: Duration) {
		self.delay.wait(duration);
	}
}
