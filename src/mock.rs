//! Recording display interface and scripted bus shared by the unit tests

use alloc::collections::VecDeque;
use alloc::vec::Vec;
use embedded_hal::delay::DelayNs;

use crate::bus::Transfer;
use crate::interface::DisplayInterface;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MockError;

#[derive(Debug, Default)]
pub struct MockInterface {
    pub commands: Vec<u8>,
    pub data: Vec<Vec<u8>>,
    pub command_data: Vec<(u8, Vec<u8>)>,
    pub last_command: Option<u8>,
    pub resets: usize,
    pub busy_waits: usize,
    /// Command that fails instead of being recorded
    pub fail_on: Option<u8>,
    /// Every busy wait fails
    pub busy_timeout: bool,
}

impl MockInterface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget everything recorded so far
    pub fn clear(&mut self) {
        self.commands.clear();
        self.data.clear();
        self.command_data.clear();
        self.last_command = None;
        self.resets = 0;
        self.busy_waits = 0;
    }

    /// Data blocks sent after `command`, in order
    pub fn data_for(&self, command: u8) -> Vec<&[u8]> {
        self.command_data
            .iter()
            .filter(|(cmd, _)| *cmd == command)
            .map(|(_, data)| data.as_slice())
            .collect()
    }

    /// All bytes sent after `command`, concatenated
    pub fn bytes_for(&self, command: u8) -> Vec<u8> {
        self.data_for(command).concat()
    }
}

impl DisplayInterface for MockInterface {
    type Error = MockError;

    fn send_command(&mut self, command: u8) -> Result<(), Self::Error> {
        if self.fail_on == Some(command) {
            return Err(MockError);
        }
        self.commands.push(command);
        self.last_command = Some(command);
        Ok(())
    }

    fn send_data(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.data.push(data.to_vec());
        if let Some(cmd) = self.last_command {
            self.command_data.push((cmd, data.to_vec()));
        }
        Ok(())
    }

    fn reset<D: DelayNs>(&mut self, _delay: &mut D) -> Result<(), Self::Error> {
        self.resets += 1;
        Ok(())
    }

    fn busy_wait<D: DelayNs>(&mut self, _delay: &mut D) -> Result<(), Self::Error> {
        self.busy_waits += 1;
        if self.busy_timeout {
            return Err(MockError);
        }
        Ok(())
    }
}

pub struct MockDelay;

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

/// Scripted transport: each transfer consumes the next script entry
///
/// Reads are filled from the entry's bytes. Once the script runs out,
/// transfers succeed and reads get `repeat` (or stay untouched).
#[derive(Debug, Default)]
pub struct MockBus {
    pub writes: Vec<Vec<u8>>,
    pub reads: usize,
    pub script: VecDeque<Result<Vec<u8>, MockError>>,
    pub repeat: Option<Vec<u8>>,
}

impl MockBus {
    pub fn with_script<T>(script: T) -> Self
    where
        T: IntoIterator<Item = Result<Vec<u8>, MockError>>,
    {
        Self {
            script: script.into_iter().collect(),
            ..Self::default()
        }
    }
}

impl Transfer for MockBus {
    type Error = MockError;

    fn transfer(&mut self, write: &[u8], read: &mut [u8]) -> Result<(), Self::Error> {
        if !write.is_empty() {
            self.writes.push(write.to_vec());
        }
        if !read.is_empty() {
            self.reads += 1;
        }
        let bytes = match self.script.pop_front() {
            Some(Err(e)) => return Err(e),
            Some(Ok(bytes)) => bytes,
            None => self.repeat.clone().unwrap_or_default(),
        };
        let len = read.len().min(bytes.len());
        read[..len].copy_from_slice(&bytes[..len]);
        Ok(())
    }
}
