use std::fmt;

use super::{
	Hardware,
	LowLevel,
};

/// First byte of every transaction addressed to a memory card
pub const MEMORY_CARD_ADDRESS: u8 = 0x81;
/// 'S': get ID
pub const IDENTIFY_OPCODE: u8 = 0x53;

const IDENTIFY_LEN: usize = 11;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Command {
	Identify,
}

impl Command {
	/// Bytes to send; trailing zeroes clock out the card's answer
	pub fn bytes(self) -> Vec<u8> {
		match self {
			Command::Identify => {
				let mut bytes = vec![MEMORY_CARD_ADDRESS, IDENTIFY_OPCODE];
				bytes.resize(IDENTIFY_LEN, 0x00);
				bytes
			},
		}
	}
}

/// Raw answer to `Command::Identify`
///
/// The first two bytes are the card's status/ready flags, the rest its
/// identification data.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct IdentifyResponse(Vec<u8>);

impl IdentifyResponse {
	pub fn as_bytes(&self) -> &[u8] {
		&self.0
	}

	pub fn into_bytes(self) -> Vec<u8> {
		self.0
	}
}

// decimal byte values, separated by spaces
impl fmt::Display for IdentifyResponse {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		for (i, b) in self.0.iter().enumerate() {
			if i > 0 {
				write!(f, " ")?;
			}
			write!(f, "{}", b)?;
		}
		Ok(())
	}
}

impl fmt::LowerHex for IdentifyResponse {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		for (i, b) in self.0.iter().enumerate() {
			if i > 0 {
				write!(f, " ")?;
			}
			write!(f, "{:02x}", b)?;
		}
		Ok(())
	}
}

pub trait MemoryCardOperations: LowLevel {
	fn execute(&mut self, command: Command) -> Vec<u8> {
		self.exchange_bytes(&command.bytes())
	}

	fn identify(&mut self) -> IdentifyResponse {
		IdentifyResponse(self.execute(Command::Identify))
	}
}

impl<H: Hardware+?Sized> MemoryCardOperations for H {
}
