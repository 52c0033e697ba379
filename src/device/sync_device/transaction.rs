// src/device/sync_device/transaction.rs

use super::Sfm3019;
use crate::common::{
    command::{Command, Response},
    error::{Sfm3019Error, WordCodecError},
    frame::MAX_RESPONSE_LEN,
    hal_traits::BridgeTransport,
};

impl<T> Sfm3019<T>
where
    T: BridgeTransport,
{
    /// Executes one command: encode, transceive, verify and interpret.
    ///
    /// Transport errors are passed through unmodified; nothing is retried.
    pub(super) fn execute(&mut self, command: &Command) -> Result<Response, Sfm3019Error<T::Error>> {
        let spec = command.frame_spec();
        let tx = spec.encode(&self.codec)?;

        let rx_len = spec.rx_length.unwrap_or(0);
        if rx_len > MAX_RESPONSE_LEN {
            return Err(WordCodecError::FrameOverflow { needed: rx_len, capacity: MAX_RESPONSE_LEN }.into());
        }
        let mut rx = [0u8; MAX_RESPONSE_LEN];

        log::trace!(
            "{:?} -> {} on {:?}: tx {:02X?}, rx {} bytes",
            command,
            self.config.address,
            self.config.port,
            tx.as_slice(),
            rx_len
        );

        let received = self
            .transport
            .transceive(
                self.config.port,
                self.config.address,
                &tx,
                &mut rx[..rx_len],
                spec.bridge_timeout(),
            )
            .map_err(Sfm3019Error::Transport)?;
        let received = &rx[..received.min(rx_len)];

        log::trace!("{:?} <- rx {:02X?}", command, received);

        let words = self.codec.decode(received)?;
        Ok(command.interpret(words.as_deref())?)
    }
}
