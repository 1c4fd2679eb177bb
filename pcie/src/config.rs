//! Board and driver configuration

use crate::debug::Level;
use error::Errno;

/// Physical base of the packet receiver/transmitter window
pub const PCIEPACKET_REGION_BASE: usize = 0x7F10_0000;
/// Length of the packet receiver/transmitter window
pub const PCIEPACKET_REGION_LENGTH: usize = 0x1000;
/// Physical address of the LED register
pub const LED_BASE: usize = 0x7F00_6000;
/// Length of the LED register window
pub const LED_LEN: usize = 0x1;

/// Tunables for a [crate::PcieCore] and its MMIO windows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    region_base: usize,
    region_len: usize,
    led_base: usize,
    led_len: usize,
    rx_offset: usize,
    tx_offset: usize,
    drain_spin: usize,
    max_unaligned_qwords: usize,
    log_level: Level,
}

/// Numeric configuration entries
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigKey {
    /// Physical base of the packet region
    RegionBase,
    /// Length of the packet region in bytes
    RegionLength,
    /// Physical base of the LED region
    LedBase,
    /// Length of the LED region in bytes
    LedLength,
    /// Offset of the receiver IP registers inside the packet region
    ReceiverOffset,
    /// Offset of the transmitter IP registers inside the packet region
    TransmitterOffset,
    /// Busy-wait iterations between drained quadwords
    DrainSpin,
    /// Upper bound (exclusive) on quadwords per [crate::PcieCore::send_tlp_unaligned]
    MaxUnalignedQuadWords,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    /// Returns the stock configuration for the reference board
    pub const fn new() -> Self {
        Self {
            region_base: PCIEPACKET_REGION_BASE,
            region_len: PCIEPACKET_REGION_LENGTH,
            led_base: LED_BASE,
            led_len: LED_LEN,
            rx_offset: 0x000,
            tx_offset: 0x100,
            drain_spin: 1 << 10,
            max_unaligned_qwords: 64,
            log_level: if cfg!(feature = "verbose") {
                Level::Debug
            } else {
                Level::Info
            },
        }
    }

    /// Sets a numeric entry
    pub fn set_usize(&mut self, key: ConfigKey, value: usize) {
        match key {
            ConfigKey::RegionBase => self.region_base = value,
            ConfigKey::RegionLength => self.region_len = value,
            ConfigKey::LedBase => self.led_base = value,
            ConfigKey::LedLength => self.led_len = value,
            ConfigKey::ReceiverOffset => self.rx_offset = value,
            ConfigKey::TransmitterOffset => self.tx_offset = value,
            ConfigKey::DrainSpin => self.drain_spin = value,
            ConfigKey::MaxUnalignedQuadWords => self.max_unaligned_qwords = value,
        }
    }

    /// Returns a numeric entry
    pub const fn get_usize(&self, key: ConfigKey) -> usize {
        match key {
            ConfigKey::RegionBase => self.region_base,
            ConfigKey::RegionLength => self.region_len,
            ConfigKey::LedBase => self.led_base,
            ConfigKey::LedLength => self.led_len,
            ConfigKey::ReceiverOffset => self.rx_offset,
            ConfigKey::TransmitterOffset => self.tx_offset,
            ConfigKey::DrainSpin => self.drain_spin,
            ConfigKey::MaxUnalignedQuadWords => self.max_unaligned_qwords,
        }
    }

    /// Returns the diagnostic threshold
    pub const fn log_level(&self) -> Level {
        self.log_level
    }

    /// Sets the diagnostic threshold
    pub fn set_log_level(&mut self, level: Level) {
        self.log_level = level;
    }

    /// Applies whitespace-separated `key=value` tokens, e.g. a boot command
    /// line. Numbers are decimal or `0x`-prefixed hex.
    ///
    /// Tokens are applied in order; on error the entries before the bad token
    /// stay applied.
    pub fn parse_cmdline(&mut self, cmdline: &str) -> Result<(), Errno> {
        for token in cmdline.split_whitespace() {
            let (key, value) = token.split_once('=').ok_or(Errno::InvalidArgument)?;

            if key == "log" {
                self.log_level = parse_level(value)?;
                continue;
            }

            let key = parse_key(key)?;
            self.set_usize(key, parse_usize(value)?);
        }
        Ok(())
    }
}

fn parse_key(name: &str) -> Result<ConfigKey, Errno> {
    match name {
        "region_base" => Ok(ConfigKey::RegionBase),
        "region_len" => Ok(ConfigKey::RegionLength),
        "led_base" => Ok(ConfigKey::LedBase),
        "led_len" => Ok(ConfigKey::LedLength),
        "rx_offset" => Ok(ConfigKey::ReceiverOffset),
        "tx_offset" => Ok(ConfigKey::TransmitterOffset),
        "drain_spin" => Ok(ConfigKey::DrainSpin),
        "max_unaligned_qwords" => Ok(ConfigKey::MaxUnalignedQuadWords),
        _ => Err(Errno::InvalidArgument),
    }
}

fn parse_level(value: &str) -> Result<Level, Errno> {
    match value {
        "debug" => Ok(Level::Debug),
        "info" => Ok(Level::Info),
        "warn" => Ok(Level::Warn),
        "error" => Ok(Level::Error),
        _ => Err(Errno::InvalidArgument),
    }
}

fn parse_usize(value: &str) -> Result<usize, Errno> {
    let res = if let Some(hex) = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
    {
        usize::from_str_radix(hex, 16)
    } else {
        value.parse()
    };
    res.map_err(|_| Errno::InvalidArgument)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.get_usize(ConfigKey::LedBase), 0x7F006000);
        assert_eq!(cfg.get_usize(ConfigKey::LedLength), 1);
        assert_eq!(cfg.get_usize(ConfigKey::DrainSpin), 1024);
        assert_eq!(cfg.get_usize(ConfigKey::MaxUnalignedQuadWords), 64);
    }

    #[test]
    fn test_set_get() {
        let mut cfg = Config::new();
        cfg.set_usize(ConfigKey::TransmitterOffset, 0x40);
        assert_eq!(cfg.get_usize(ConfigKey::TransmitterOffset), 0x40);
        assert_eq!(cfg.get_usize(ConfigKey::ReceiverOffset), 0);
    }

    #[test]
    fn test_parse_cmdline() {
        let mut cfg = Config::new();
        cfg.parse_cmdline("region_base=0x80000000  drain_spin=16 log=warn")
            .unwrap();
        assert_eq!(cfg.get_usize(ConfigKey::RegionBase), 0x80000000);
        assert_eq!(cfg.get_usize(ConfigKey::DrainSpin), 16);
        assert_eq!(cfg.log_level(), Level::Warn);
    }

    #[test]
    fn test_parse_cmdline_invalid() {
        let mut cfg = Config::new();
        assert_eq!(cfg.parse_cmdline("bogus=1"), Err(Errno::InvalidArgument));
        assert_eq!(cfg.parse_cmdline("drain_spin"), Err(Errno::InvalidArgument));
        assert_eq!(cfg.parse_cmdline("drain_spin=0xZZ"), Err(Errno::InvalidArgument));
        assert_eq!(cfg.parse_cmdline("log=loud"), Err(Errno::InvalidArgument));

        // Earlier tokens stay applied
        assert_eq!(
            cfg.parse_cmdline("led_len=4 nope=1"),
            Err(Errno::InvalidArgument)
        );
        assert_eq!(cfg.get_usize(ConfigKey::LedLength), 4);
    }

    #[test]
    fn test_parse_empty() {
        let mut cfg = Config::new();
        cfg.parse_cmdline("").unwrap();
        assert_eq!(cfg, Config::new());
    }
}
