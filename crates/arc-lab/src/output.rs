//! JSON-lines records on stdout.
//!
//! Every line is one JSON object tagged with a `record` field naming its
//! kind (`experiment`, `metrics`, `trace`, `summary`, `sweep`, `scenario`,
//! `controller`).

use std::io::Write;

use arc_control::ControllerKind;
use arc_types::Trace;
use serde::Serialize;

use crate::error::LabError;

#[derive(Serialize)]
struct Record<'a, T> {
    record: &'static str,
    #[serde(flatten)]
    body: &'a T,
}

/// A full trace tagged with the run that produced it.
#[derive(Debug, Serialize)]
pub struct TraceRecord<'a> {
    /// Scenario name.
    pub scenario: &'a str,
    /// Controller.
    pub controller: ControllerKind,
    /// Generator seed.
    pub seed: u64,
    /// The per-step columns.
    pub trace: &'a Trace,
}

/// A catalog scenario, for `list`.
#[derive(Debug, Serialize)]
pub struct ScenarioEntry {
    /// Stable name.
    pub name: &'static str,
    /// Perturbation onset step.
    pub onset: usize,
    /// Steps per run.
    pub horizon: usize,
    /// Whether the disturbance reads the agent's arousal.
    pub state_coupled: bool,
}

/// A registered controller, for `list`.
#[derive(Debug, Serialize)]
pub struct ControllerEntry {
    /// Stable name.
    pub name: ControllerKind,
    /// Whether `ablation` runs it.
    pub ablation: bool,
    /// Whether `run` runs it when the config selects no controllers.
    pub comparison: bool,
}

/// Line-delimited JSON writer.
#[derive(Debug)]
pub struct JsonLines<W: Write> {
    out: W,
    count: usize,
}

impl<W: Write> JsonLines<W> {
    /// Wrap a writer.
    pub const fn new(out: W) -> Self {
        Self { out, count: 0 }
    }

    /// Write `body` as one line tagged `record`.
    pub fn emit<T: Serialize>(&mut self, record: &'static str, body: &T) -> Result<(), LabError> {
        serde_json::to_writer(&mut self.out, &Record { record, body })?;
        self.out.write_all(b"\n")?;
        self.count = self.count.saturating_add(1);
        Ok(())
    }

    /// Flush and return the number of records written.
    pub fn finish(mut self) -> Result<usize, LabError> {
        self.out.flush()?;
        Ok(self.count)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn each_record_is_one_tagged_line() {
        let mut buf = Vec::new();
        let mut out = JsonLines::new(&mut buf);
        out.emit(
            "controller",
            &ControllerEntry {
                name: ControllerKind::ArcV1Lqi,
                ablation: false,
                comparison: true,
            },
        )
        .unwrap();
        out.emit(
            "scenario",
            &ScenarioEntry {
                name: "gaslighting",
                onset: 0,
                horizon: 160,
                state_coupled: false,
            },
        )
        .unwrap();
        assert_eq!(out.finish().unwrap(), 2);

        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<serde_json::Value> = text
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        let (controller, scenario) = (lines.first().unwrap(), lines.last().unwrap());
        assert_eq!(controller["record"], "controller");
        assert_eq!(controller["name"], "arc_v1_lqi");
        assert_eq!(scenario["record"], "scenario");
        assert_eq!(scenario["horizon"], 160);
    }
}
