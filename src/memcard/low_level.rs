use super::{
	Hardware,
	InLine,
	OutLine,
};

/// An open transaction: SEL is held low until this is dropped
pub struct Transaction<'a, H: ?Sized+Hardware+'a>(&'a mut H);

impl<'a, H: ?Sized+Hardware> Transaction<'a, H> {
	// shift `out_byte` out on CMD (LSB first) while sampling DAT on each CLK
	// low phase.
	//
	// CLK idles high; the card latches CMD on the rising edge and presents its
	// next bit after the falling edge.
	pub fn exchange_byte(&mut self, out_byte: u8) -> u8 {
		let timing = self.0.timing();
		let mut in_byte = 0u8;

		for bit in 0..8 {
			let bit_mask = 1u8 << bit;

			self.0.set_line(OutLine::Command, 0 != (out_byte & bit_mask));
			self.0.set_line(OutLine::Clock, false);
			self.0.delay(timing.half_period());

			if self.0.read_line(InLine::Data) {
				in_byte |= bit_mask;
			}

			self.0.set_line(OutLine::Clock, true);
			self.0.delay(timing.half_period());
		}

		// idle bus between bytes; gives the card time to prepare the next one
		self.0.set_line(OutLine::Clock, true);
		self.0.set_line(OutLine::Command, false);
		self.0.delay(timing.quarter_period());

		// ACK is only sampled for tracing; it costs a GPIO access per byte
		if log_enabled!(log::Level::Trace) {
			let ack = self.0.read_line(InLine::Acknowledge);
			trace!("exchanged byte: out 0x{:02x}, in 0x{:02x}, ACK {}", out_byte, in_byte, if ack { "high" } else { "low" });
		}

		in_byte
	}
}

impl<'a, H: ?Sized+Hardware> Drop for Transaction<'a, H> {
	fn drop(&mut self) {
		self.0.set_line(OutLine::Select, true);
	}
}

pub trait LowLevel: Hardware {
	// pull SEL low and give the card a quarter period to wake up
	fn start_transaction(&mut self) -> Transaction<'_, Self> {
		self.set_line(OutLine::Select, false);
		let settle = self.timing().quarter_period();
		self.delay(settle);

		Transaction(self)
	}

	/// Exchange all `out_bytes` within a single SEL period; the result has
	/// the same length, byte `i` being the card's answer to `out_bytes[i]`.
	fn exchange_bytes(&mut self, out_bytes: &[u8]) -> Vec<u8> {
		debug!("starting transaction with {} bytes", out_bytes.len());

		let mut tx = self.start_transaction();
		let in_bytes: Vec<u8> = out_bytes.iter()
			.map(|&out_byte| tx.exchange_byte(out_byte))
			.collect();
		drop(tx);

		debug!("finished transaction");
		in_bytes
	}
}

impl<H: Hardware+?Sized> LowLevel for H {
}
