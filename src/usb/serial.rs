//! USB CDC-ACM serial port that receives weather records.
//!
//! Initialises the Embassy USB stack on the nRF52840 hardware USB
//! peripheral and exposes one CDC-ACM interface.

use defmt::{debug, info, warn};
use embassy_futures::join::join;
use embassy_nrf::usb::vbus_detect::HardwareVbusDetect;
use embassy_nrf::usb::Driver;
use embassy_nrf::{self, bind_interrupts, peripherals};
use embassy_usb::class::cdc_acm::{CdcAcmClass, State};
use embassy_usb::driver::EndpointError;
use embassy_usb::{Builder, Config, UsbDevice};
use static_cell::StaticCell;
use wxframe::config;
use wxframe::weather::{LineAssembler, ParseError};

use crate::ui::render::SharedLog;

bind_interrupts!(struct Irqs {
    USBD => embassy_nrf::usb::InterruptHandler<peripherals::USBD>;
    CLOCK_POWER => embassy_nrf::usb::vbus_detect::InterruptHandler;
});

type UsbDriver = Driver<'static, peripherals::USBD, HardwareVbusDetect>;

static CDC_STATE: StaticCell<State> = StaticCell::new();
static USB_CONFIG_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_BOS_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_MSOS_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_CTRL_BUF: StaticCell<[u8; 64]> = StaticCell::new();

/// Build result containing the USB device runner and the serial class.
pub struct UsbSerial {
    pub device: UsbDevice<'static, UsbDriver>,
    pub class: CdcAcmClass<'static, UsbDriver>,
}

/// Initialise the USB stack and create the serial port.
///
/// Must be called exactly once.  All static buffers are consumed here.
pub fn init(usbd: peripherals::USBD) -> UsbSerial {
    let driver = Driver::new(usbd, Irqs, HardwareVbusDetect::new(Irqs));

    let mut usb_config = Config::new(config::USB_VID, config::USB_PID);
    usb_config.manufacturer = Some(config::USB_MANUFACTURER);
    usb_config.product = Some(config::USB_PRODUCT);
    usb_config.serial_number = Some(config::USB_SERIAL_NUMBER);
    usb_config.max_power = 100; // mA
    usb_config.max_packet_size_0 = 64;

    let config_desc = USB_CONFIG_DESC.init([0u8; 256]);
    let bos_desc = USB_BOS_DESC.init([0u8; 256]);
    let msos_desc = USB_MSOS_DESC.init([0u8; 256]);
    let ctrl_buf = USB_CTRL_BUF.init([0u8; 64]);

    let mut builder = Builder::new(
        driver,
        usb_config,
        config_desc,
        bos_desc,
        msos_desc,
        ctrl_buf,
    );

    let state = CDC_STATE.init(State::new());
    let class = CdcAcmClass::new(&mut builder, state, config::USB_SERIAL_PACKET_SIZE);
    let device = builder.build();

    info!("USB serial device initialised");

    UsbSerial { device, class }
}

/// Run enumeration and the line receiver side by side. Never returns in
/// practice.
pub async fn run(usb: UsbSerial, log: &'static SharedLog) {
    let UsbSerial { mut device, mut class } = usb;
    join(device.run(), receive_lines(&mut class, log)).await;
}

async fn receive_lines(class: &mut CdcAcmClass<'static, UsbDriver>, log: &'static SharedLog) {
    let mut asm = LineAssembler::new();
    let mut buf = [0u8; config::USB_SERIAL_PACKET_SIZE as usize];

    loop {
        class.wait_connection().await;
        info!("serial: host connected");

        loop {
            let n = match class.read_packet(&mut buf).await {
                Ok(n) => n,
                Err(EndpointError::BufferOverflow) => {
                    warn!("serial: packet overflow");
                    continue;
                }
                Err(EndpointError::Disabled) => break,
            };

            let mut log = log.lock().await;
            asm.push(&buf[..n], |line| match log.ingest_line(line) {
                Ok(()) => debug!("serial: record {}", log.received()),
                Err(ParseError::Header) => {}
                Err(e) => warn!("serial: rejected line: {}", e),
            });
        }

        info!("serial: host disconnected");
    }
}
