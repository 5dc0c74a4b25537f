#[macro_use]
extern crate clap;
#[macro_use]
extern crate log;

extern crate psx_memcard_bitbang;
use psx_memcard_bitbang::*;

use std::process::exit;

use psx_memcard_bitbang::gpio::LineMap;
use psx_memcard_bitbang::memcard::{
	DEFAULT_PERIOD,
	DelayStrategy,
	IdentifyResponse,
	MemoryCardOperations,
	Timing,
};

fn get_param_or<T>(matches: &clap::ArgMatches, name: &str, default: T) -> AResult<T>
where
	T: std::str::FromStr,
	failure::Error: From<<T as std::str::FromStr>::Err>,
{
	let param = match matches.value_of(name) {
		Some(p) => p,
		None => return Ok(default),
	};
	param.parse::<T>().map_err(|e| {
		let e = failure::Error::from(e);
		let msg = format!("invalid parameter {}: {}", name, e);
		e.context(msg).into()
	})
}

// takes ownership so the lines are released right after the transaction
fn identify<H: MemoryCardOperations>(mut lines: H) -> IdentifyResponse {
	lines.identify()
}

fn main_app() -> AResult<()> {
	let matches = clap_app!(@app (app_from_crate!())
		(@arg period: -p --period +takes_value "bit period T in microseconds (4 to 1000, default 32)")
		(@arg pins: --pins +takes_value "BCM GPIO numbers for SEL,CLK,CMD,DAT,ACK (default 8,4,10,9,25)")
		(@arg delay: --delay +takes_value "delay strategy: sleep, spin or hybrid[:SLACK_US] (default hybrid)")
		(@arg loopback: --loopback "use a software loopback instead of the GPIO lines")
		(@arg hex: --hex "print the response in hex")
	).get_matches();

	let period = get_param_or(&matches, "period", DEFAULT_PERIOD.as_micros() as u64)?;
	let timing = Timing::from_micros(period)?;
	let delay: DelayStrategy = get_param_or(&matches, "delay", DelayStrategy::default())?;

	let response = if matches.is_present("loopback") {
		identify(gpio::open_loopback(timing, delay))
	} else {
		let map: LineMap = get_param_or(&matches, "pins", LineMap::default())?;
		identify(gpio::open_gpio(map, timing, delay)?)
	};

	if matches.is_present("hex") {
		println!("{:x}", response);
	} else {
		println!("{}", response);
	}

	Ok(())
}

fn main() {
	env_logger::from_env(env_logger::Env::default().default_filter_or("info")).init();

	if let Err(e) = main_app() {
		error!("Error: {}", e);
		exit(1);
	}
}
