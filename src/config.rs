//! Compile-time constants and the persisted configuration data model.
//!
//! Timing parameters, protocol constants and the `DeviceConfiguration`
//! schema live here so they can be tuned in one place. The configuration
//! record itself is pure data; the byte codec lives in `storage`.

// Report pipeline

/// Binary right-shift applied to mouse X/Y when zoom (slow) mode is active.
/// A shift of 2 reduces pointer speed to one quarter.
pub const MOUSE_ZOOM_SHIFT: u32 = 2;

/// Depth of the local mouse delivery queue. A depth of 1 would already give
/// the correct semantics; the extra slots only smooth short bursts while the
/// transmit endpoint is busy.
pub const MOUSE_QUEUE_DEPTH: usize = 8;

// USB

/// USB VID/PID - use the "pid.codes" open-source test VID.
/// Replace with your own allocated VID/PID for production.
pub const USB_VID: u16 = 0x1209;
pub const USB_PID: u16 = 0x0002;

/// USB device strings.
pub const USB_MANUFACTURER: &str = "duokvm";
pub const USB_PRODUCT: &str = "Dual-host KVM Switch";
pub const USB_SERIAL_NUMBER: &str = "000001";

/// USB HID polling interval (ms). 1 ms = 1000 Hz for lowest latency.
pub const USB_HID_POLL_MS: u8 = 1;

// Inter-board link

/// UART baud rate of the board-to-board link.
pub const RELAY_BAUD_RATE: u32 = 3_686_400;

// Persisted configuration

/// Sentinel marking a valid persisted configuration record.
pub const CONFIG_MAGIC: u32 = 0x0B00_B1E5;

/// Schema version of the persisted record. A mismatch means the blob is
/// treated as absent and replaced by the compiled-in defaults, never repaired.
pub const CONFIG_VERSION: u16 = 1;

/// Flash page index where the configuration record is stored (4 KB pages).
pub const CONFIG_FLASH_PAGE_START: u32 = 508;

/// Number of flash pages reserved for configuration storage.
pub const CONFIG_FLASH_PAGE_COUNT: u32 = 4;

/// Default screensaver idle threshold (microseconds).
pub const SCREENSAVER_IDLE_TIME_US: u64 = 240 * 1_000_000;

/// Default screensaver maximum runtime (microseconds).
pub const SCREENSAVER_MAX_TIME_US: u64 = 3600 * 1_000_000;

/// Operating system class of a downstream host. Affects how other
/// subsystems shape reports (e.g. scroll direction); carried here as data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum OsClass {
    Linux = 0,
    MacOs = 1,
    Windows = 2,
    Other = 255,
}

/// Screensaver animation run on an idle output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ScreensaverMode {
    Disabled = 0,
    Pong = 1,
    Jitter = 2,
}

/// Screensaver parameters for one output. Thresholds are inputs to the
/// external timer state machine; nothing in this crate runs them.
///
/// `idle_time_us <= max_time_us` is assumed but not enforced here.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScreensaverConfig {
    pub mode: ScreensaverMode,
    pub only_if_inactive: bool,
    pub idle_time_us: u64,
    pub max_time_us: u64,
}

/// Identity and per-host settings of one physical output. Exactly two
/// instances exist, one per downstream host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OutputDescriptor {
    /// Identity tag (0 = output A, 1 = output B), fixed per compiled role.
    pub number: u8,
    pub os_class: OsClass,
    pub screensaver: ScreensaverConfig,
}

/// Persisted device configuration (singleton).
///
/// Constructed once as a compiled-in default, mutated only by the external
/// configuration editor. The report pipeline never writes it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceConfiguration {
    pub magic_header: u32,
    pub version: u16,
    pub outputs: [OutputDescriptor; 2],
    /// Bind each peripheral to a fixed physical port.
    pub enforce_ports: bool,
    /// Force attached keyboards into the boot protocol.
    pub force_kbd_boot_protocol: bool,
    /// Treat every attached mouse as boot-protocol regardless of descriptor.
    pub force_mouse_boot_mode: bool,
    /// HID usage code of the key that toggles the active output.
    pub hotkey_toggle: u8,
    /// Mirror the active output on the keyboard LEDs.
    pub kbd_led_as_indicator: bool,
}

impl DeviceConfiguration {
    /// Compiled-in default used at first boot and whenever the persisted
    /// record fails validation.
    pub const fn compiled_default() -> Self {
        const SCREENSAVER_DEFAULT: ScreensaverConfig = ScreensaverConfig {
            mode: ScreensaverMode::Disabled,
            only_if_inactive: true,
            idle_time_us: SCREENSAVER_IDLE_TIME_US,
            max_time_us: SCREENSAVER_MAX_TIME_US,
        };

        Self {
            magic_header: CONFIG_MAGIC,
            version: CONFIG_VERSION,
            outputs: [
                OutputDescriptor {
                    number: 0,
                    os_class: OsClass::Linux,
                    screensaver: SCREENSAVER_DEFAULT,
                },
                OutputDescriptor {
                    number: 1,
                    os_class: OsClass::Windows,
                    screensaver: SCREENSAVER_DEFAULT,
                },
            ],
            enforce_ports: false,
            force_kbd_boot_protocol: false,
            force_mouse_boot_mode: false,
            hotkey_toggle: 0x39, // Caps Lock
            kbd_led_as_indicator: false,
        }
    }

    /// A record is valid only when the magic sentinel and schema version
    /// both match exactly.
    pub fn is_valid(&self) -> bool {
        self.magic_header == CONFIG_MAGIC && self.version == CONFIG_VERSION
    }
}
