//! Persistent storage for the startup settings.
//!
//! Uses the nRF52840's internal flash via `sequential-storage` crate
//! so settings edited in the menu survive a power cycle.
//!
//! Storage layout:
//!   - One key-value item holding the serialized [`Settings`] record.
//!   - Records are appended sequentially; the flash pages are managed
//!     by `sequential-storage` which handles wear levelling and GC.

use defmt::{debug, error, info, warn};
use embedded_storage_async::nor_flash::NorFlash;
use wxframe::config::{
    Settings, SETTINGS_RECORD_SIZE, STORAGE_FLASH_PAGE_COUNT, STORAGE_FLASH_PAGE_START,
};

/// Flash page size for nRF52840 (4 KB).
const FLASH_PAGE_SIZE: u32 = 4096;

/// Start address of our storage region.
const STORAGE_START: u32 = STORAGE_FLASH_PAGE_START * FLASH_PAGE_SIZE;

/// End address (exclusive) of our storage region.
const STORAGE_END: u32 = (STORAGE_FLASH_PAGE_START + STORAGE_FLASH_PAGE_COUNT) * FLASH_PAGE_SIZE;

/// Key for the settings record in the map storage.
const KEY_SETTINGS: u8 = 0x01;

/// Scratch buffer for sequential-storage (item header + record, word aligned).
const SCRATCH_SIZE: usize = 64;

/// Settings record in flash.
pub struct SettingsStore<F> {
    flash: F,
}

impl<F: NorFlash> SettingsStore<F> {
    pub fn new(flash: F) -> Self {
        Self { flash }
    }

    /// Read the stored settings. `None` if nothing usable is stored.
    pub async fn load(&mut self) -> Option<Settings> {
        let mut buf = [0u8; SCRATCH_SIZE];

        match sequential_storage::map::fetch_item::<u8, &[u8], _>(
            &mut self.flash,
            STORAGE_START..STORAGE_END,
            &mut sequential_storage::cache::NoCache::new(),
            &mut buf,
            &KEY_SETTINGS,
        )
        .await
        {
            Ok(Some(data)) => {
                let settings = Settings::deserialize(data);
                if settings.is_none() {
                    warn!("Stored settings record not recognised");
                }
                settings
            }
            Ok(None) => {
                info!("No settings in flash");
                None
            }
            Err(e) => {
                error!("Flash read error: {:?}", defmt::Debug2Format(&e));
                None
            }
        }
    }

    /// Persist settings. Errors are logged; the running settings stay in
    /// effect either way.
    pub async fn save(&mut self, settings: &Settings) {
        let mut buf = [0u8; SCRATCH_SIZE];
        let mut record = [0u8; SETTINGS_RECORD_SIZE];
        let len = settings.serialize(&mut record);
        let item = &record[..len];

        match sequential_storage::map::store_item::<u8, &[u8], _>(
            &mut self.flash,
            STORAGE_START..STORAGE_END,
            &mut sequential_storage::cache::NoCache::new(),
            &mut buf,
            &KEY_SETTINGS,
            &item,
        )
        .await
        {
            Ok(_) => info!("Saved settings to flash"),
            Err(e) => error!("Flash write error: {:?}", defmt::Debug2Format(&e)),
        }
        debug!("settings: {}", settings);
    }
}
