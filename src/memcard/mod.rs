/// Protocol for PlayStation memory cards, bit-banged over GPIO
///
/// The card sits on the controller port bus, a synchronous serial link
/// with these lines (as seen from the host):
/// - SEL (out): active low "attention"; held low for a whole transaction
/// - CLK (out): idles high; the card shifts out on the falling edge
/// - CMD (out): host to card data
/// - DAT (in): card to host data, sampled while CLK is low
/// - ACK (in): active low pulse from the card after each byte
///
/// Bytes are transferred LSB first, one bit per CLK cycle, and each byte
/// sent is answered by a byte received in the same eight cycles.
///
/// Transaction:
/// - pull SEL low, wait a quarter bit period
/// - exchange bytes
/// - release SEL
///
/// Commands: (first byte 0x81 addresses the memory card on the bus)
/// - 0x53 ('S'): get ID, 9 more filler bytes; 11 bytes in total
///
/// ACK is only sampled for diagnostics; transfers rely on fixed delays.

mod hardware;
mod low_level;
mod operations;

#[cfg(test)]
pub(crate) mod testutils;

pub use self::hardware::{
	DEFAULT_PERIOD,
	DelayStrategy,
	Hardware,
	InLine,
	MAX_PERIOD,
	MIN_PERIOD,
	OutLine,
	Timing,
	reliable_sleep,
};

pub use self::low_level::{
	LowLevel,
	Transaction,
};

pub use self::operations::{
	Command,
	IDENTIFY_OPCODE,
	IdentifyResponse,
	MEMORY_CARD_ADDRESS,
	MemoryCardOperations,
};
