// Copyright 2024, F. Stan
//
// Licensed under the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>,
// This file may not be copied, modified, or distributed
// except according to those terms.

//! Scripted bus double for the unit tests.

use std::cell::RefCell;
use std::collections::HashMap;
use std::io;
use std::rc::Rc;

use crate::config::Config;
use crate::error::{Result, Sgp30Error};
use crate::transport::{Bus, Transport};

#[derive(Debug, Default)]
pub struct Script {
    /// Reply bytes served after a write starting with the given command.
    pub replies: HashMap<u16, Vec<u8>>,
    pub fail_write: bool,
    /// Commands whose write fails.
    pub fail_commands: Vec<u16>,
    pub fail_read: bool,
    pub fail_close: bool,
    pub fail_connect: bool,
    pub writes: Vec<Vec<u8>>,
    pub reads: Vec<usize>,
    pub closed: usize,
    pub connects: usize,
    pending: Option<Vec<u8>>,
}

impl Script {
    pub fn reply(&mut self, command: u16, bytes: &[u8]) {
        self.replies.insert(command, bytes.to_vec());
    }
}

#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    pub script: Rc<RefCell<Script>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Transport for MockTransport {
    type Error = io::Error;

    fn write(&mut self, buf: &[u8]) -> io::Result<()> {
        let mut script = self.script.borrow_mut();
        script.writes.push(buf.to_vec());
        let command = match buf {
            [high, low, ..] => Some(u16::from_be_bytes([*high, *low])),
            _ => None,
        };
        let failing = command.map_or(false, |c| script.fail_commands.contains(&c));
        if script.fail_write || failing {
            return Err(io::Error::new(io::ErrorKind::Other, "write fail"));
        }
        script.pending = command.and_then(|c| script.replies.get(&c).cloned());
        Ok(())
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<()> {
        let mut script = self.script.borrow_mut();
        script.reads.push(buf.len());
        if script.fail_read {
            return Err(io::Error::new(io::ErrorKind::Other, "read fail"));
        }
        match script.pending.take() {
            Some(reply) if reply.len() == buf.len() => {
                buf.copy_from_slice(&reply);
                Ok(())
            }
            _ => Err(io::Error::new(io::ErrorKind::UnexpectedEof, "no reply")),
        }
    }

    fn close(self) -> io::Result<()> {
        let mut script = self.script.borrow_mut();
        script.closed += 1;
        if script.fail_close {
            return Err(io::Error::new(io::ErrorKind::Other, "close fail"));
        }
        Ok(())
    }
}

/// Hands out transports sharing one script.
#[derive(Debug, Clone, Default)]
pub struct MockBus {
    pub script: Rc<RefCell<Script>>,
}

impl MockBus {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Bus for MockBus {
    type Transport = MockTransport;

    fn connect(&mut self, config: &Config) -> Result<MockTransport> {
        let mut script = self.script.borrow_mut();
        script.connects += 1;
        if script.fail_connect {
            return Err(Sgp30Error::ConnectionError {
                path: config.i2c_path.clone(),
                source: Box::new(io::Error::from(io::ErrorKind::NotFound)),
            });
        }
        Ok(MockTransport {
            script: Rc::clone(&self.script),
        })
    }
}
