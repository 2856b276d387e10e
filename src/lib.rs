//! # BD3491FS Driver
//!
//! This is a driver for the ROHM BD3491FS Sound Processor.
//!
//! Specifically, this driver is for setting the registers in the BD3491FS
//! over I²C - the audio itself stays in the analog domain inside the chip
//! and this driver never touches it.
//!
//! The BD3491FS has the following controls:
//!
//! * Six stereo analog Inputs, of which one at a time is routed through
//! * Input Gain, from 0dB to +20dB
//! * Two independent output channels, each attenuated from 0dB to -87dB
//! * Bass and Treble tone controls, each cutting or boosting up to 14dB
//! * A Surround effect, with selectable strength
//!
//! The BD3491FS's registers are *write-only* and this driver keeps no shadow
//! of them. The one piece of state it does hold is the most recently
//! selected input, so that [`Bd3491fs::unmute`] can put it back.
//!
//! Every method takes `&mut self` and blocks until the bus transaction is
//! done, so exclusive access is enforced at compile time; to drive one chip
//! from several threads, wrap the driver in your own mutex.
//!
//! # Example
//!
//! You might set up the chip like this:
//!
//! ```rust
//! # use embedded_hal::blocking::i2c::Write;
//! # struct I2c;
//! # impl embedded_hal::blocking::i2c::Write for I2c {
//! #     type Error = ();
//! #     fn write(&mut self, address: embedded_hal::blocking::i2c::SevenBitAddress, bytes: &[u8]) -> Result<(), Self::Error> {
//! #         Ok(())
//! #     }
//! # }
//! # fn main() -> Result<(), bd3491fs::Error<()>> {
//! # let i2c = I2c;
//! let mut audio = bd3491fs::Bd3491fs::new(i2c);
//! audio.reset()?;
//! audio.set_input(bd3491fs::Input::A)?;
//! audio.set_input_gain(bd3491fs::Level::Db6)?;
//! audio.set_volume_ch1(24)?;
//! audio.set_volume_ch2(24)?;
//! audio.set_bass(bd3491fs::Level::Db4, bd3491fs::ToneAdjust::Boost)?;
//! audio.set_treble(bd3491fs::Level::Db2, bd3491fs::ToneAdjust::Cut)?;
//! audio.set_surround(bd3491fs::SurroundLevel::Off)?;
//! # Ok(())
//! # }
//! ```

#![no_std]
#![deny(unsafe_code)]
#![deny(missing_docs)]

//
// Public Types
//

/// The errors this driver can report.
///
/// `E` is whatever error type the underlying I²C implementation uses.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Error<E> {
    /// The I²C bus rejected or failed the transfer.
    Bus(E),
    /// The requested level is a step the input gain stage doesn't have.
    ReservedLevel,
    /// The requested level is beyond what the tone stage can apply.
    LevelTooHigh,
    /// The requested attenuation is deeper than the volume stage can go.
    AttenuationTooHigh,
}

/// The input sources that can be routed through to the output stages.
///
/// The BD3491FS plays exactly one source at a time - selecting an input
/// deselects the previous one.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Input {
    /// Stereo input A
    A = 0b000,
    /// Stereo input B
    B = 0b001,
    /// Stereo input C
    C = 0b010,
    /// Stereo input D
    D = 0b011,
    /// Stereo input E
    E = 0b100,
    /// Stereo input F
    F = 0b101,
}

/// Gain and tone levels, in 2dB steps.
///
/// Not every path takes every level: the input gain stage has no 10dB or
/// 14dB step, and the tone controls stop at 14dB.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Level {
    /// 0dB
    Db0 = 0,
    /// 2dB
    Db2 = 1,
    /// 4dB
    Db4 = 2,
    /// 6dB
    Db6 = 3,
    /// 8dB
    Db8 = 4,
    /// 10dB
    Db10 = 5,
    /// 12dB
    Db12 = 6,
    /// 14dB
    Db14 = 7,
    /// 16dB
    Db16 = 8,
    /// 18dB
    Db18 = 9,
    /// 20dB
    Db20 = 10,
}

/// Whether a tone control takes level away from its band, or adds it.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ToneAdjust {
    /// Lower the band's level
    Cut,
    /// Raise the band's level
    Boost,
}

/// The strength of the surround effect.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SurroundLevel {
    /// Surround disabled
    Off = 0x00,
    /// Gentle widening
    Low = 0x05,
    /// Noticeable widening
    Mid = 0x07,
    /// The full effect
    High = 0x0A,
}

/// Represents the BD3491FS chip on the far end of the bus.
///
/// The driver owns the bus it is given; [`Bd3491fs::release`] hands it
/// back.
pub struct Bd3491fs<I2C> {
    i2c: I2C,
    bus_address: u8,
    selected_input: Input,
}

//
// Private Types
//

/// The set of registers in the BD3491FS
#[derive(Copy, Clone, Debug)]
enum Register {
    InputSelector = 0x04,
    InputGain = 0x06,
    VolumeCh1 = 0x21,
    VolumeCh2 = 0x22,
    BassGain = 0x51,
    TrebleGain = 0x57,
    Surround = 0x78,
    SystemReset = 0xFE,
}

//
// Public Data
//

/// The BD3491FS's standard 7-bit bus address.
pub const DEFAULT_ADDRESS: u8 = 0x41;

//
// Private Data
//

/// Writing this to the system reset register restores the power-on
/// configuration.
const RESET_COMMAND: u8 = 0x81;

/// The input selector code that routes no input at all.
const INPUT_MUTE: u8 = 0b111;

//
// impls on Public Types
//

impl<I2C> Bd3491fs<I2C> {
    /// Create a driver for a BD3491FS at the standard bus address.
    ///
    /// Takes ownership of the bus. Nothing is sent to the chip until you
    /// call [`Bd3491fs::reset`], which should be the first thing you do.
    pub fn new(i2c: I2C) -> Bd3491fs<I2C> {
        Bd3491fs::new_with_address(i2c, DEFAULT_ADDRESS)
    }

    /// Create a driver for a BD3491FS at a non-standard bus address.
    pub fn new_with_address(i2c: I2C, bus_address: u8) -> Bd3491fs<I2C> {
        Bd3491fs {
            i2c,
            bus_address,
            selected_input: Input::A,
        }
    }

    /// Destroy the driver and hand the bus back.
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C> Bd3491fs<I2C>
where
    I2C: embedded_hal::blocking::i2c::Write,
{
    /// Reset the BD3491FS, putting every register back to its power-on
    /// value.
    ///
    /// The chip doesn't report completion - a successful (acknowledged)
    /// write is all the confirmation there is. This also serves as the
    /// probe for the chip being present: run it once after construction,
    /// and treat an error as "no BD3491FS on this bus". Running it again
    /// just resets the chip again.
    pub fn reset(&mut self) -> Result<(), Error<I2C::Error>> {
        self.write_register(Register::SystemReset, RESET_COMMAND)
    }

    /// Route one of the six inputs through to the output stages.
    ///
    /// The selection is remembered as the input that [`Bd3491fs::unmute`]
    /// goes back to.
    pub fn set_input(&mut self, input: Input) -> Result<(), Error<I2C::Error>> {
        self.write_register(Register::InputSelector, input as u8)?;
        self.selected_input = input;
        Ok(())
    }

    /// Set the gain applied ahead of the selected input.
    ///
    /// Asking for [`Level::Db10`] or [`Level::Db14`] is refused without
    /// touching the chip - the input gain stage doesn't have those steps.
    pub fn set_input_gain(&mut self, gain: Level) -> Result<(), Error<I2C::Error>> {
        self.write_register(Register::InputGain, input_gain_byte(gain)?)
    }

    /// Set the attenuation for output channel 1.
    ///
    /// `attenuation` is in whole dB below full volume, from 0 to 87.
    pub fn set_volume_ch1(&mut self, attenuation: u8) -> Result<(), Error<I2C::Error>> {
        self.write_register(Register::VolumeCh1, volume_byte(attenuation)?)
    }

    /// Set the attenuation for output channel 2.
    ///
    /// `attenuation` is in whole dB below full volume, from 0 to 87.
    pub fn set_volume_ch2(&mut self, attenuation: u8) -> Result<(), Error<I2C::Error>> {
        self.write_register(Register::VolumeCh2, volume_byte(attenuation)?)
    }

    /// Cut or boost the bass band.
    ///
    /// `level` can go up to [`Level::Db14`].
    pub fn set_bass(&mut self, level: Level, adjust: ToneAdjust) -> Result<(), Error<I2C::Error>> {
        self.write_register(Register::BassGain, tone_byte(level, adjust)?)
    }

    /// Cut or boost the treble band.
    ///
    /// `level` can go up to [`Level::Db14`].
    pub fn set_treble(
        &mut self,
        level: Level,
        adjust: ToneAdjust,
    ) -> Result<(), Error<I2C::Error>> {
        self.write_register(Register::TrebleGain, tone_byte(level, adjust)?)
    }

    /// Set the strength of the surround effect, or turn it off.
    pub fn set_surround(&mut self, level: SurroundLevel) -> Result<(), Error<I2C::Error>> {
        self.write_register(Register::Surround, surround_byte(level))
    }

    /// Silence the chip by deselecting every input.
    ///
    /// The volume, tone and surround settings are untouched, as is the
    /// remembered input selection.
    pub fn mute(&mut self) -> Result<(), Error<I2C::Error>> {
        self.write_register(Register::InputSelector, INPUT_MUTE)
    }

    /// Bring the audio back after [`Bd3491fs::mute`].
    ///
    /// Re-selects whichever input was last set with [`Bd3491fs::set_input`]
    /// ([`Input::A`] if it never was).
    pub fn unmute(&mut self) -> Result<(), Error<I2C::Error>> {
        self.write_register(Register::InputSelector, self.selected_input as u8)
    }

    /// Write one byte to one register.
    fn write_register(&mut self, register: Register, value: u8) -> Result<(), Error<I2C::Error>> {
        let buffer = [register as u8, value];
        #[cfg(feature = "defmt")]
        defmt::debug!("Setting BD3491FS 0x{:02x} to 0x{:02x}", register as u8, value);
        self.i2c
            .write(self.bus_address, &buffer)
            .map_err(Error::Bus)
    }
}

//
// impls on Private Types
//

// None

//
// Private Functions
//

/// Pack an input gain level into its register encoding.
///
/// The 10dB and 14dB steps exist on the tone paths but not here. The low
/// bit of the register is reserved, so the level sits one bit up.
fn input_gain_byte<E>(gain: Level) -> Result<u8, Error<E>> {
    if gain == Level::Db10 || gain == Level::Db14 {
        return Err(Error::ReservedLevel);
    }
    Ok((gain as u8) << 1)
}

/// Pack a volume attenuation into its register encoding.
///
/// The volume registers count in 1dB steps from bit 1; the low bit is
/// reserved.
fn volume_byte<E>(attenuation: u8) -> Result<u8, Error<E>> {
    if attenuation > 87 {
        return Err(Error::AttenuationTooHigh);
    }
    Ok(attenuation << 1)
}

/// Pack a tone level and direction into its register encoding.
///
/// Bit 7 set means cut, clear means boost; the level goes in the low bits.
fn tone_byte<E>(level: Level, adjust: ToneAdjust) -> Result<u8, Error<E>> {
    if (level as u8) > (Level::Db14 as u8) {
        return Err(Error::LevelTooHigh);
    }
    let direction = match adjust {
        ToneAdjust::Cut => 1 << 7,
        ToneAdjust::Boost => 0,
    };
    Ok(direction | level as u8)
}

/// Pack a surround level into its register encoding.
///
/// Bit 7 enables the effect; it stays clear for [`SurroundLevel::Off`].
fn surround_byte(level: SurroundLevel) -> u8 {
    let enable = if level == SurroundLevel::Off { 0 } else { 1 << 7 };
    enable | ((level as u8) & 0x7F)
}

//
// Tests
//


//
// End of file
//
