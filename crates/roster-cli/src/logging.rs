// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use std::env;
use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::{self, MakeWriter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Where log lines go for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
enum LogSink {
    File(PathBuf),
    Stderr,
    // The table view owns the terminal.
    Discard,
}

fn log_sink(file: Option<&Path>, interactive: bool) -> LogSink {
    match (file, interactive) {
        (Some(path), _) => LogSink::File(path.to_path_buf()),
        (None, false) => LogSink::Stderr,
        (None, true) => LogSink::Discard,
    }
}

/// `RUST_LOG` wins over the configured level when it is set.
fn build_filter(level: &str) -> Result<EnvFilter> {
    match env::var(EnvFilter::DEFAULT_ENV) {
        Ok(directives) if !directives.trim().is_empty() => {
            EnvFilter::try_new(&directives).with_context(|| format!("parse RUST_LOG {directives:?}"))
        }
        _ => EnvFilter::try_new(level).with_context(|| format!("parse log level {level:?}")),
    }
}

pub fn init(level: &str, file: Option<&Path>, interactive: bool) -> Result<()> {
    let filter = build_filter(level)?;
    match log_sink(file, interactive) {
        LogSink::File(path) => {
            let handle = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("open log file {}", path.display()))?;
            install(filter, Mutex::new(handle), false)
        }
        LogSink::Stderr => install(filter, io::stderr, true),
        LogSink::Discard => install(filter, io::sink, false),
    }
}

fn install<W>(filter: EnvFilter, writer: W, ansi: bool) -> Result<()>
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(ansi)
                .with_target(true),
        )
        .try_init()
        .context("install tracing subscriber")
}
