//! SSD1309 / SH1106 OLED surface
//!
//! Driver for 128x64 page-addressed monochrome OLEDs over I2C. The bus is
//! handed in already configured; this driver only speaks the controller's
//! command set.

use embedded_graphics::prelude::Size;
use embedded_hal::i2c::I2c;

use ember_core::compose::Framebuffer;
use ember_core::traits::{DisplaySurface, SurfaceError};

/// Display dimensions
const WIDTH: usize = 128;
const HEIGHT: usize = 64;
const PAGES: usize = HEIGHT / 8;

/// Control bytes
const CONTROL_COMMAND: u8 = 0x00;
const CONTROL_DATA: u8 = 0x40;

/// SSD130x / SH1106 commands
mod cmd {
    // Panel
    pub const DISPLAY_OFF: u8 = 0xAE;
    pub const DISPLAY_ON: u8 = 0xAF;
    pub const SET_CONTRAST: u8 = 0x81;
    pub const SET_NORMAL: u8 = 0xA6;
    pub const SET_INVERSE: u8 = 0xA7;

    // Addressing
    pub const SET_MEMORY_MODE: u8 = 0x20;
    pub const SET_PAGE_ADDR: u8 = 0xB0;
    pub const SET_LOW_COLUMN: u8 = 0x00;
    pub const SET_HIGH_COLUMN: u8 = 0x10;
    pub const SET_START_LINE: u8 = 0x40;

    // Wiring and geometry
    pub const SET_MUX_RATIO: u8 = 0xA8;
    pub const SET_DISPLAY_OFFSET: u8 = 0xD3;
    pub const SET_SEG_REMAP: u8 = 0xA1;
    pub const SET_COM_SCAN_DEC: u8 = 0xC8;
    pub const SET_COM_PINS: u8 = 0xDA;

    // Drive and timing
    pub const SET_CLOCK_DIV: u8 = 0xD5;
    pub const SET_PRECHARGE: u8 = 0xD9;
    pub const SET_VCOM_DETECT: u8 = 0xDB;
    pub const SET_CHARGE_PUMP: u8 = 0x8D;
}

/// Controller chip on the module
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Controller {
    /// SSD1309 (2.42" modules)
    Ssd1309,
    /// SH1106 (1.3" modules), 132-column RAM with the panel at column 2
    Sh1106,
}

impl Controller {
    /// RAM column of the panel's leftmost pixel
    pub const fn column_offset(self) -> u8 {
        match self {
            Controller::Ssd1309 => 0,
            Controller::Sh1106 => 2,
        }
    }

    fn init_sequence(self) -> &'static [u8] {
        match self {
            Controller::Ssd1309 => &[
                cmd::DISPLAY_OFF,
                cmd::SET_CLOCK_DIV,
                0xA0,
                cmd::SET_MUX_RATIO,
                0x3F, // 64 lines
                cmd::SET_DISPLAY_OFFSET,
                0x00,
                cmd::SET_START_LINE,
                cmd::SET_MEMORY_MODE,
                0x02, // Page addressing
                cmd::SET_SEG_REMAP,
                cmd::SET_COM_SCAN_DEC,
                cmd::SET_COM_PINS,
                0x12,
                cmd::SET_CONTRAST,
                0x6F,
                cmd::SET_PRECHARGE,
                0xD3,
                cmd::SET_VCOM_DETECT,
                0x20,
                cmd::SET_NORMAL,
                cmd::DISPLAY_ON,
            ],
            Controller::Sh1106 => &[
                cmd::DISPLAY_OFF,
                cmd::SET_CLOCK_DIV,
                0x80,
                cmd::SET_MUX_RATIO,
                0x3F,
                cmd::SET_DISPLAY_OFFSET,
                0x00,
                cmd::SET_START_LINE,
                cmd::SET_CHARGE_PUMP,
                0x14, // Enable charge pump
                cmd::SET_SEG_REMAP,
                cmd::SET_COM_SCAN_DEC,
                cmd::SET_COM_PINS,
                0x12,
                cmd::SET_CONTRAST,
                0xCF,
                cmd::SET_PRECHARGE,
                0xF1,
                cmd::SET_VCOM_DETECT,
                0x40,
                cmd::SET_NORMAL,
                cmd::DISPLAY_ON,
            ],
        }
    }
}

/// Page-addressed 128x64 OLED
///
/// Reports not-ready until [`init`](Oled::init) succeeds.
pub struct Oled<I2C> {
    i2c: I2C,
    address: u8,
    controller: Controller,
    ready: bool,
}

impl<I2C: I2c> Oled<I2C> {
    pub fn new(i2c: I2C, address: u8, controller: Controller) -> Self {
        Self {
            i2c,
            address,
            controller,
            ready: false,
        }
    }

    /// Send the power-up sequence and blank the panel
    pub fn init(&mut self) -> Result<(), SurfaceError> {
        self.ready = false;
        for &c in self.controller.init_sequence() {
            self.command(c)?;
        }
        self.write_pages(|_, page| page.fill(0))?;
        self.ready = true;
        Ok(())
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    pub fn controller(&self) -> Controller {
        self.controller
    }

    /// Give the bus back
    pub fn release(self) -> I2C {
        self.i2c
    }

    /// Set display contrast (0-255)
    pub fn set_contrast(&mut self, contrast: u8) -> Result<(), SurfaceError> {
        self.command(cmd::SET_CONTRAST)?;
        self.command(contrast)
    }

    /// Turn display on/off
    pub fn set_display_on(&mut self, on: bool) -> Result<(), SurfaceError> {
        if on {
            self.command(cmd::DISPLAY_ON)
        } else {
            self.command(cmd::DISPLAY_OFF)
        }
    }

    /// Invert display colors
    pub fn set_inverted(&mut self, inverted: bool) -> Result<(), SurfaceError> {
        if inverted {
            self.command(cmd::SET_INVERSE)
        } else {
            self.command(cmd::SET_NORMAL)
        }
    }

    fn command(&mut self, cmd: u8) -> Result<(), SurfaceError> {
        self.i2c
            .write(self.address, &[CONTROL_COMMAND, cmd])
            .map_err(|_| SurfaceError::Communication)
    }

    /// Fill and send every page in turn
    fn write_pages<F>(&mut self, mut fill: F) -> Result<(), SurfaceError>
    where
        F: FnMut(u32, &mut [u8]),
    {
        let offset = self.controller.column_offset();
        let mut data = [0u8; WIDTH + 1];
        data[0] = CONTROL_DATA;
        for page in 0..PAGES as u8 {
            self.command(cmd::SET_PAGE_ADDR | page)?;
            self.command(cmd::SET_LOW_COLUMN | (offset & 0x0F))?;
            self.command(cmd::SET_HIGH_COLUMN | (offset >> 4))?;

            fill(u32::from(page), &mut data[1..]);
            self.i2c
                .write(self.address, &data)
                .map_err(|_| SurfaceError::Communication)?;
        }
        Ok(())
    }
}

impl<I2C: I2c> DisplaySurface for Oled<I2C> {
    fn clear(&mut self) -> Result<(), SurfaceError> {
        if !self.ready {
            return Err(SurfaceError::NotReady);
        }
        self.write_pages(|_, page| page.fill(0))
    }

    fn transmit(&mut self, framebuffer: &Framebuffer) -> Result<(), SurfaceError> {
        if !self.ready {
            return Err(SurfaceError::NotReady);
        }
        if framebuffer.width() as usize != WIDTH || framebuffer.height() as usize != HEIGHT {
            return Err(SurfaceError::SizeMismatch);
        }
        self.write_pages(|page, buf| framebuffer.page_into(page, buf))
    }

    fn dimensions(&self) -> Size {
        Size::new(WIDTH as u32, HEIGHT as u32)
    }

    fn is_ready(&self) -> bool {
        self.ready
    }
}
