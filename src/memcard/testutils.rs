use std::collections::VecDeque;
use std::time::Duration;

use super::{
	Hardware,
	InLine,
	OutLine,
	Timing,
};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Event {
	Set(OutLine, bool, Duration),
	Read(InLine, bool, Duration),
}

pub enum DataSource {
	Low,
	High,
	// DAT wired to CMD
	Loopback,
	// one level per DAT read, LOW once exhausted
	Script(Vec<bool>),
}

/// Fake hardware recording every line access against a virtual clock
pub struct Recorder {
	timing: Timing,
	data: DataSource,
	script: VecDeque<bool>,
	command: bool,
	now: Duration,
	pub events: Vec<Event>,
}

impl Recorder {
	pub fn new(timing: Timing, data: DataSource) -> Self {
		let script = match &data {
			DataSource::Script(bits) => bits.iter().cloned().collect(),
			_ => VecDeque::new(),
		};
		Recorder {
			timing,
			data,
			script,
			command: false,
			now: Duration::default(),
			events: Vec::new(),
		}
	}

	pub fn elapsed(&self) -> Duration {
		self.now
	}

	// levels driven on `line`, in order
	pub fn levels(&self, line: OutLine) -> Vec<bool> {
		self.events.iter().filter_map(|event| match *event {
			Event::Set(l, level, _) if l == line => Some(level),
			_ => None,
		}).collect()
	}
}

impl Hardware for Recorder {
	fn set_line(&mut self, line: OutLine, high: bool) {
		if line == OutLine::Command {
			self.command = high;
		}
		self.events.push(Event::Set(line, high, self.now));
	}

	fn read_line(&mut self, line: InLine) -> bool {
		let level = match line {
			InLine::Acknowledge => true,
			InLine::Data => match self.data {
				DataSource::Low => false,
				DataSource::High => true,
				DataSource::Loopback => self.command,
				DataSource::Script(_) => self.script.pop_front().unwrap_or(false),
			},
		};
		self.events.push(Event::Read(line, level, self.now));
		level
	}

	fn timing(&self) -> Timing {
		self.timing
	}

	fn delay(&mut self, duration: Duration) {
		self.now += duration;
	}
}
