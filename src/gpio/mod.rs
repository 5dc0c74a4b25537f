use std::fmt;
use std::str;

use rppal::gpio::{
	Gpio,
	InputPin,
	OutputPin,
};

mod lines;
mod loopback;
mod rpi;

pub use self::lines::{
	GpioLines,
	InputLine,
	OutputLine,
	PinBank,
};

pub use self::loopback::Loopback;

use crate::memcard::{
	DelayStrategy,
	InLine,
	OutLine,
	Timing,
};

/// Raspberry Pi GPIO count (BCM GPIO0 to GPIO53)
pub const PIN_COUNT: u8 = 54;

/// Broadcom GPIO number
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Pin(pub u8);

impl fmt::Display for Pin {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "GPIO{}", self.0)
	}
}

/// Assignment of bus lines to GPIO pins
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct LineMap {
	pub select: Pin,
	pub clock: Pin,
	pub command: Pin,
	pub data: Pin,
	pub acknowledge: Pin,
}

impl LineMap {
	pub fn out_pin(&self, line: OutLine) -> Pin {
		match line {
			OutLine::Select => self.select,
			OutLine::Clock => self.clock,
			OutLine::Command => self.command,
		}
	}

	pub fn in_pin(&self, line: InLine) -> Pin {
		match line {
			InLine::Data => self.data,
			InLine::Acknowledge => self.acknowledge,
		}
	}

	pub fn outputs(&self) -> [Pin; 3] {
		[self.select, self.clock, self.command]
	}

	pub fn inputs(&self) -> [Pin; 2] {
		[self.data, self.acknowledge]
	}

	pub fn validate(&self) -> crate::AResult<()> {
		let pins = [self.select, self.clock, self.command, self.data, self.acknowledge];
		for (i, pin) in pins.iter().enumerate() {
			ensure!(pin.0 < PIN_COUNT, "{} doesn't exist (only {} GPIOs)", pin, PIN_COUNT);
			ensure!(!pins[..i].contains(pin), "{} assigned to more than one line", pin);
		}
		Ok(())
	}
}

// SEL: SPI_CE0, CLK: GPCLK0, CMD: SPI_MOSI, DAT: SPI_MISO, ACK: GPIO25
impl Default for LineMap {
	fn default() -> Self {
		LineMap {
			select: Pin(8),
			clock: Pin(4),
			command: Pin(10),
			data: Pin(9),
			acknowledge: Pin(25),
		}
	}
}

impl fmt::Display for LineMap {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(
			f,
			"{},{},{},{},{}",
			self.select.0,
			self.clock.0,
			self.command.0,
			self.data.0,
			self.acknowledge.0,
		)
	}
}

impl str::FromStr for LineMap {
	type Err = ::failure::Error;

	// SEL,CLK,CMD,DAT,ACK
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let fields: Vec<&str> = s.split(',').map(|field| field.trim()).collect();
		ensure!(fields.len() == 5, "expected 5 comma separated pins (SEL,CLK,CMD,DAT,ACK), got {:?}", s);

		let mut pins = [Pin(0); 5];
		for (pin, field) in pins.iter_mut().zip(&fields) {
			*pin = Pin(with_context!(("invalid GPIO number: {:?}", field),
				field.parse::<u8>().map_err(|e| e.into())
			)?);
		}

		let map = LineMap {
			select: pins[0],
			clock: pins[1],
			command: pins[2],
			data: pins[3],
			acknowledge: pins[4],
		};
		map.validate()?;
		Ok(map)
	}
}

/// Claim the lines in `map` on the Raspberry Pi GPIO; they are released
/// when the returned value is dropped.
pub fn open_gpio(map: LineMap, timing: Timing, delay: DelayStrategy) -> crate::AResult<GpioLines<OutputPin, InputPin>> {
	map.validate()?;
	let mut gpio = with_context!("couldn't open Raspberry Pi GPIO",
		Gpio::new().map_err(|e| e.into())
	)?;
	info!("claiming lines {} (T = {:?}, delay {})", map, timing.period(), delay);
	GpioLines::claim(&mut gpio, map, timing, delay)
}

pub fn open_loopback(timing: Timing, delay: DelayStrategy) -> Loopback {
	info!("using software loopback (T = {:?}, delay {})", timing.period(), delay);
	Loopback::new(timing, delay)
}
