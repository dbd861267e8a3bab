//! Persisted configuration record: byte codec and flash access.
//!
//! The codec is pure and host-testable; the flash I/O (via
//! `sequential-storage`, which handles wear levelling and GC) only exists
//! in embedded builds.
//!
//! Record layout (fixed size, little-endian):
//! ```text
//! 0..4    magic sentinel (u32)
//! 4..6    schema version (u16)
//! 6..26   output A block
//! 26..46  output B block
//! 46      enforce_ports
//! 47      force_kbd_boot_protocol
//! 48      force_mouse_boot_mode
//! 49      hotkey_toggle (HID usage code)
//! 50      kbd_led_as_indicator
//! ```
//! Each output block: number, os_class, screensaver mode,
//! only_if_inactive, idle_time_us (u64), max_time_us (u64).

use crate::config::{
    DeviceConfiguration, OsClass, OutputDescriptor, ScreensaverConfig, ScreensaverMode,
    CONFIG_MAGIC, CONFIG_VERSION,
};
use crate::error::Error;

/// Serialized configuration record size in bytes.
pub const CONFIG_RECORD_SIZE: usize = 51;

const OUTPUT_BLOCK_SIZE: usize = 20;

/// Serialise a configuration record. Returns the number of bytes written,
/// or 0 when the buffer is too small.
pub fn encode_config(config: &DeviceConfiguration, buf: &mut [u8]) -> usize {
    if buf.len() < CONFIG_RECORD_SIZE {
        return 0;
    }

    buf[0..4].copy_from_slice(&config.magic_header.to_le_bytes());
    buf[4..6].copy_from_slice(&config.version.to_le_bytes());

    for (i, output) in config.outputs.iter().enumerate() {
        let base = 6 + i * OUTPUT_BLOCK_SIZE;
        buf[base] = output.number;
        buf[base + 1] = output.os_class as u8;
        buf[base + 2] = output.screensaver.mode as u8;
        buf[base + 3] = output.screensaver.only_if_inactive as u8;
        buf[base + 4..base + 12].copy_from_slice(&output.screensaver.idle_time_us.to_le_bytes());
        buf[base + 12..base + 20].copy_from_slice(&output.screensaver.max_time_us.to_le_bytes());
    }

    buf[46] = config.enforce_ports as u8;
    buf[47] = config.force_kbd_boot_protocol as u8;
    buf[48] = config.force_mouse_boot_mode as u8;
    buf[49] = config.hotkey_toggle;
    buf[50] = config.kbd_led_as_indicator as u8;

    CONFIG_RECORD_SIZE
}

/// Parse a persisted record. A magic or version mismatch is a hard failure:
/// the blob is treated as absent by the caller, never repaired.
pub fn decode_config(data: &[u8]) -> Result<DeviceConfiguration, Error> {
    if data.len() < CONFIG_RECORD_SIZE {
        return Err(Error::ConfigTruncated);
    }

    let magic = u32::from_le_bytes([data[0], data[1], data[2], data[3]]);
    if magic != CONFIG_MAGIC {
        return Err(Error::ConfigMagic);
    }

    let version = u16::from_le_bytes([data[4], data[5]]);
    if version != CONFIG_VERSION {
        return Err(Error::ConfigVersion);
    }

    let mut outputs = [DeviceConfiguration::compiled_default().outputs[0]; 2];
    for (i, output) in outputs.iter_mut().enumerate() {
        let base = 6 + i * OUTPUT_BLOCK_SIZE;
        *output = OutputDescriptor {
            number: data[base],
            os_class: match data[base + 1] {
                0 => OsClass::Linux,
                1 => OsClass::MacOs,
                2 => OsClass::Windows,
                _ => OsClass::Other,
            },
            screensaver: ScreensaverConfig {
                mode: match data[base + 2] {
                    1 => ScreensaverMode::Pong,
                    2 => ScreensaverMode::Jitter,
                    _ => ScreensaverMode::Disabled,
                },
                only_if_inactive: data[base + 3] != 0,
                idle_time_us: u64_at(data, base + 4),
                max_time_us: u64_at(data, base + 12),
            },
        };
    }

    Ok(DeviceConfiguration {
        magic_header: magic,
        version,
        outputs,
        enforce_ports: data[46] != 0,
        force_kbd_boot_protocol: data[47] != 0,
        force_mouse_boot_mode: data[48] != 0,
        hotkey_toggle: data[49],
        kbd_led_as_indicator: data[50] != 0,
    })
}

fn u64_at(data: &[u8], offset: usize) -> u64 {
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&data[offset..offset + 8]);
    u64::from_le_bytes(bytes)
}

// Flash access (embedded builds only)

#[cfg(feature = "embedded")]
mod flash {
    use super::*;
    use crate::config::{CONFIG_FLASH_PAGE_COUNT, CONFIG_FLASH_PAGE_START};
    use defmt::{error, info, warn};

    /// Flash page size on the RP2040 W25Q flash (4 KB erase sectors).
    const FLASH_PAGE_SIZE: u32 = 4096;

    const STORAGE_START: u32 = CONFIG_FLASH_PAGE_START * FLASH_PAGE_SIZE;
    const STORAGE_END: u32 = (CONFIG_FLASH_PAGE_START + CONFIG_FLASH_PAGE_COUNT) * FLASH_PAGE_SIZE;

    /// Key for the configuration record in the map storage.
    const KEY_CONFIG: u8 = 0x01;

    /// Load the configuration from flash, falling back to the compiled-in
    /// default when the record is absent or fails validation.
    pub async fn load_config(
        flash: &mut impl embedded_storage_async::nor_flash::NorFlash,
    ) -> DeviceConfiguration {
        let mut buf = [0u8; CONFIG_RECORD_SIZE * 2];

        match sequential_storage::map::fetch_item::<u8, &[u8], _>(
            flash,
            STORAGE_START..STORAGE_END,
            &mut sequential_storage::cache::NoCache::new(),
            &mut buf,
            &KEY_CONFIG,
        )
        .await
        {
            Ok(Some(data)) => match decode_config(data) {
                Ok(config) => {
                    info!("Loaded configuration from flash");
                    config
                }
                Err(e) => {
                    warn!("Stored configuration invalid ({}), using defaults", e);
                    DeviceConfiguration::compiled_default()
                }
            },
            Ok(None) => {
                info!("No configuration in flash, using defaults");
                DeviceConfiguration::compiled_default()
            }
            Err(e) => {
                error!("Flash read error: {:?}", defmt::Debug2Format(&e));
                DeviceConfiguration::compiled_default()
            }
        }
    }

    /// Persist the configuration to flash.
    pub async fn save_config(
        flash: &mut impl embedded_storage_async::nor_flash::NorFlash,
        config: &DeviceConfiguration,
    ) -> Result<(), Error> {
        let mut record = [0u8; CONFIG_RECORD_SIZE];
        encode_config(config, &mut record);

        let mut buf = [0u8; CONFIG_RECORD_SIZE * 2];
        let item: &[u8] = &record;

        match sequential_storage::map::store_item::<u8, &[u8], _>(
            flash,
            STORAGE_START..STORAGE_END,
            &mut sequential_storage::cache::NoCache::new(),
            &mut buf,
            &KEY_CONFIG,
            &item,
        )
        .await
        {
            Ok(_) => {
                info!("Saved configuration to flash");
                Ok(())
            }
            Err(e) => {
                error!("Flash write error: {:?}", defmt::Debug2Format(&e));
                Err(Error::Storage)
            }
        }
    }
}

#[cfg(feature = "embedded")]
pub use flash::{load_config, save_config};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let config = DeviceConfiguration::compiled_default();
        assert!(config.is_valid());

        let mut buf = [0u8; CONFIG_RECORD_SIZE];
        assert_eq!(encode_config(&config, &mut buf), CONFIG_RECORD_SIZE);

        let decoded = decode_config(&buf).unwrap();
        assert_eq!(decoded, config);
    }

    #[test]
    fn encode_into_short_buffer_fails() {
        let config = DeviceConfiguration::compiled_default();
        let mut buf = [0u8; CONFIG_RECORD_SIZE - 1];
        assert_eq!(encode_config(&config, &mut buf), 0);
    }

    #[test]
    fn magic_mismatch_is_rejected() {
        let mut buf = [0u8; CONFIG_RECORD_SIZE];
        encode_config(&DeviceConfiguration::compiled_default(), &mut buf);
        buf[0] ^= 0xFF;

        assert_eq!(decode_config(&buf), Err(Error::ConfigMagic));
    }

    #[test]
    fn version_mismatch_is_rejected_not_repaired() {
        let mut buf = [0u8; CONFIG_RECORD_SIZE];
        encode_config(&DeviceConfiguration::compiled_default(), &mut buf);
        buf[4] = CONFIG_VERSION as u8 + 1;

        assert_eq!(decode_config(&buf), Err(Error::ConfigVersion));
    }

    #[test]
    fn truncated_record_is_rejected() {
        let mut buf = [0u8; CONFIG_RECORD_SIZE];
        encode_config(&DeviceConfiguration::compiled_default(), &mut buf);

        assert_eq!(
            decode_config(&buf[..CONFIG_RECORD_SIZE - 1]),
            Err(Error::ConfigTruncated)
        );
    }

    #[test]
    fn non_default_fields_survive_roundtrip() {
        let mut config = DeviceConfiguration::compiled_default();
        config.outputs[1].os_class = OsClass::MacOs;
        config.outputs[1].screensaver.mode = ScreensaverMode::Pong;
        config.outputs[1].screensaver.idle_time_us = 42;
        config.enforce_ports = true;
        config.hotkey_toggle = 0x64;

        let mut buf = [0u8; CONFIG_RECORD_SIZE];
        encode_config(&config, &mut buf);
        assert_eq!(decode_config(&buf).unwrap(), config);
    }
}
