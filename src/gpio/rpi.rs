use rppal::gpio::{
	Gpio,
	InputPin,
	OutputPin,
};

use super::{
	InputLine,
	OutputLine,
	Pin,
	PinBank,
};

// rppal pins return to the mode they had before on drop

impl PinBank for Gpio {
	type Output = OutputPin;
	type Input = InputPin;

	fn claim_output(&mut self, pin: Pin, high: bool) -> crate::AResult<OutputPin> {
		let gpio_pin = self.get(pin.0)?;
		Ok(if high { gpio_pin.into_output_high() } else { gpio_pin.into_output_low() })
	}

	fn claim_input(&mut self, pin: Pin) -> crate::AResult<InputPin> {
		Ok(self.get(pin.0)?.into_input())
	}
}

impl OutputLine for OutputPin {
	fn write(&mut self, high: bool) {
		if high {
			self.set_high();
		} else {
			self.set_low();
		}
	}
}

impl InputLine for InputPin {
	fn read(&mut self) -> bool {
		self.is_high()
	}
}
