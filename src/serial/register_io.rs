//! Trait abstraction for register transactions to enable testing

use async_trait::async_trait;
use std::io;
use tokio_modbus::client::Context;
use tokio_modbus::prelude::{Reader, Writer};

/// Trait for one request/response exchange with the controller
///
/// Framing, addressing, CRC and retries of the exchange itself live behind
/// this boundary; the decoders only see an ordered block of 16-bit values or
/// a failure.
#[async_trait]
pub trait RegisterIO: Send {
    /// Read `count` consecutive registers starting at `start`
    async fn read_block(&mut self, start: u16, count: u16) -> io::Result<Vec<u16>>;

    /// Write a single register
    async fn write_register(&mut self, addr: u16, value: u16) -> io::Result<()>;
}

/// Wrapper around a tokio-modbus RTU context that implements RegisterIO
pub struct ModbusRegisterIO {
    context: Context,
}

impl ModbusRegisterIO {
    pub fn new(context: Context) -> Self {
        Self { context }
    }
}

impl std::fmt::Debug for ModbusRegisterIO {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModbusRegisterIO").finish_non_exhaustive()
    }
}

#[async_trait]
impl RegisterIO for ModbusRegisterIO {
    async fn read_block(&mut self, start: u16, count: u16) -> io::Result<Vec<u16>> {
        self.context.read_holding_registers(start, count).await
    }

    async fn write_register(&mut self, addr: u16, value: u16) -> io::Result<()> {
        self.context.write_single_register(addr, value).await
    }
}
