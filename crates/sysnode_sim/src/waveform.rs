//! Waveform recording of device ports.
//!
//! The [`WaveformRecorder`] trait abstracts waveform output. [`VcdRecorder`]
//! writes IEEE 1364 Value Change Dump text that GTKWave or Surfer can open,
//! which is the usual way to inspect a failing cycle.

use std::collections::HashMap;
use std::io::Write;

use sysnode_common::{Logic, LogicVec};

use crate::error::SimError;
use crate::time::SimTime;
use crate::value::SimSignalId;

/// Sink for port value changes.
pub trait WaveformRecorder {
    /// Opens a scope (hierarchy level). Must precede the first registration.
    fn begin_scope(&mut self, name: &str) -> Result<(), SimError>;

    /// Declares a port for recording.
    fn register_port(&mut self, id: SimSignalId, name: &str, width: u32) -> Result<(), SimError>;

    /// Closes the current scope.
    fn end_scope(&mut self) -> Result<(), SimError>;

    /// Records the value of a port at `time`. Times must be non-decreasing.
    fn record_change(&mut self, time: SimTime, id: SimSignalId, value: &LogicVec)
        -> Result<(), SimError>;

    /// Flushes the output.
    fn finalize(&mut self) -> Result<(), SimError>;
}

/// VCD recorder.
///
/// Identifier codes are drawn from the printable ASCII range starting at `!`.
pub struct VcdRecorder<W: Write> {
    writer: W,
    codes: HashMap<SimSignalId, (String, u32)>,
    header_written: bool,
    definitions_closed: bool,
    current_time: Option<u64>,
}

impl<W: Write> VcdRecorder<W> {
    /// Creates a new VCD recorder writing to the given output.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            codes: HashMap::new(),
            header_written: false,
            definitions_closed: false,
            current_time: None,
        }
    }

    /// Consumes the recorder and returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn ensure_header(&mut self) -> Result<(), SimError> {
        if self.header_written {
            return Ok(());
        }
        writeln!(self.writer, "$version")?;
        writeln!(self.writer, "  sysnode processor-node model")?;
        writeln!(self.writer, "$end")?;
        writeln!(self.writer, "$timescale")?;
        writeln!(self.writer, "  1fs")?;
        writeln!(self.writer, "$end")?;
        self.header_written = true;
        Ok(())
    }

    fn close_definitions(&mut self) -> Result<(), SimError> {
        self.ensure_header()?;
        if !self.definitions_closed {
            writeln!(self.writer, "$enddefinitions $end")?;
            self.definitions_closed = true;
        }
        Ok(())
    }

    /// Generates a VCD identifier code from a sequential index.
    fn make_id_code(index: usize) -> String {
        let mut code = String::new();
        let mut idx = index;
        loop {
            code.push((b'!' + (idx % 94) as u8) as char);
            idx /= 94;
            if idx == 0 {
                break;
            }
            idx -= 1;
        }
        code
    }

    fn logic_char(bit: Logic) -> char {
        match bit {
            Logic::Zero => '0',
            Logic::One => '1',
            Logic::X => 'x',
            Logic::Z => 'z',
        }
    }
}

impl<W: Write> WaveformRecorder for VcdRecorder<W> {
    fn begin_scope(&mut self, name: &str) -> Result<(), SimError> {
        self.ensure_header()?;
        writeln!(self.writer, "$scope module {name} $end")?;
        Ok(())
    }

    fn register_port(&mut self, id: SimSignalId, name: &str, width: u32) -> Result<(), SimError> {
        let code = Self::make_id_code(self.codes.len());
        writeln!(self.writer, "$var wire {width} {code} {name} $end")?;
        self.codes.insert(id, (code, width));
        Ok(())
    }

    fn end_scope(&mut self) -> Result<(), SimError> {
        writeln!(self.writer, "$upscope $end")?;
        Ok(())
    }

    fn record_change(
        &mut self,
        time: SimTime,
        id: SimSignalId,
        value: &LogicVec,
    ) -> Result<(), SimError> {
        self.close_definitions()?;
        if self.current_time != Some(time.fs) {
            writeln!(self.writer, "#{}", time.fs)?;
            self.current_time = Some(time.fs);
        }

        let (code, width) =
            self.codes
                .get(&id)
                .cloned()
                .ok_or_else(|| SimError::InvalidPortRef {
                    reason: format!("port {} is not registered for recording", id.as_raw()),
                })?;

        if width == 1 {
            writeln!(self.writer, "{}{code}", Self::logic_char(value.get(0)))?;
        } else {
            let bits: String = (0..width).rev().map(|i| Self::logic_char(value.get(i))).collect();
            writeln!(self.writer, "b{bits} {code}")?;
        }
        Ok(())
    }

    fn finalize(&mut self) -> Result<(), SimError> {
        self.close_definitions()?;
        self.writer.flush()?;
        Ok(())
    }
}
