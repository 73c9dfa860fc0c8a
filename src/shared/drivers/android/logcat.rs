// This is free and unencumbered software released into the public domain.

//! Routes `tracing` output to the Android log.

use alloc::ffi::CString;
use core::ffi::{CStr, c_int};
use ndk_sys::{__android_log_write, android_LogPriority};
use std::io;
use tracing::{Level, Metadata};
use tracing_subscriber::fmt::MakeWriter;

const TAG: &CStr = c"native-camera2";

#[link(name = "log")]
unsafe extern "C" {}

/// Buffers one formatted event and writes it as a single log line on drop.
#[derive(Debug)]
pub struct LogcatWriter {
    priority: android_LogPriority,
    buffer: Vec<u8>,
}

impl io::Write for LogcatWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for LogcatWriter {
    fn drop(&mut self) {
        let line: Vec<u8> = self
            .buffer
            .iter()
            .copied()
            .filter(|&b| b != 0)
            .collect();
        let Ok(text) = CString::new(line.trim_ascii_end()) else {
            return;
        };
        unsafe {
            __android_log_write(self.priority.0 as c_int, TAG.as_ptr(), text.as_ptr());
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Logcat;

impl Logcat {
    fn writer(priority: android_LogPriority) -> LogcatWriter {
        LogcatWriter {
            priority,
            buffer: Vec::with_capacity(128),
        }
    }
}

impl<'a> MakeWriter<'a> for Logcat {
    type Writer = LogcatWriter;

    fn make_writer(&'a self) -> Self::Writer {
        Self::writer(android_LogPriority::ANDROID_LOG_INFO)
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        let priority = match *meta.level() {
            Level::ERROR => android_LogPriority::ANDROID_LOG_ERROR,
            Level::WARN => android_LogPriority::ANDROID_LOG_WARN,
            Level::INFO => android_LogPriority::ANDROID_LOG_INFO,
            Level::DEBUG => android_LogPriority::ANDROID_LOG_DEBUG,
            Level::TRACE => android_LogPriority::ANDROID_LOG_VERBOSE,
        };
        Self::writer(priority)
    }
}

/// Installs a logcat subscriber unless one is already set.
pub fn init() {
    let _ = tracing_subscriber::fmt()
        .with_writer(Logcat)
        .with_ansi(false)
        .without_time()
        .with_target(false)
        .with_max_level(Level::DEBUG)
        .try_init();
}
