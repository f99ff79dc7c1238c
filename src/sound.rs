use beep::beep;
use std::error::Error;

/// the single tone the machine can make, gated on the sound timer
pub trait Sound {
    fn beep(&mut self) -> Result<(), Box<dyn Error>>;
    fn stop(&mut self) -> Result<(), Box<dyn Error>>;
}

const BELL_PITCH_HZ: u16 = 2093; // C7

/// fixed-pitch tone through the terminal bell device. The host calls beep()
/// on every frame the sound timer is nonzero, so both calls are idempotent.
pub struct TermBell {
    sounding: bool,
}

impl TermBell {
    pub fn new() -> Self {
        TermBell { sounding: false }
    }
}

impl Default for TermBell {
    fn default() -> Self {
        Self::new()
    }
}

impl Sound for TermBell {
    fn beep(&mut self) -> Result<(), Box<dyn Error>> {
        if !self.sounding {
            beep(BELL_PITCH_HZ)?;
            self.sounding = true;
        }
        Ok(())
    }

    fn stop(&mut self) -> Result<(), Box<dyn Error>> {
        if self.sounding {
            beep(0)?;
            self.sounding = false;
        }
        Ok(())
    }
}

/// silent Sound for hosts without a bell device, and for tests
pub struct Mute;

impl Mute {
    pub fn new() -> Self {
        Mute {}
    }
}

impl Sound for Mute {
    fn beep(&mut self) -> Result<(), Box<dyn Error>> {
        Ok(())
    }

    fn stop(&mut self) -> Result<(), Box<dyn Error>> {
        Ok(())
    }
}
