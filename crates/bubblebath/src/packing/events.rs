//! Event types and sinks for observing packing runs.
//!
//! This module defines [`PackEvent`] and a set of sinks to emit, collect, or forward events
//! while executing [`crate::packing::bubblebath_in_place_with_events`] or the
//! [`crate::packing::Packer`] runner. Events are advisory diagnostics; nothing in the
//! packing outcome depends on which sink is attached.
use crate::packing::{PackOptions, PackReport};

/// Describes events emitted by packing operations.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
pub enum PackEvent {
    /// Emitted when a radius sequence was drawn from a distribution.
    RadiiGenerated {
        /// Number of accepted radii.
        count: usize,
        /// Total number of draws that did not fit the fraction budget.
        rejected_draws: usize,
    },

    /// Emitted before the first placement attempt.
    RunStarted {
        /// Options in effect for this run.
        options: PackOptions,
        /// Number of radii queued for insertion.
        requested: usize,
        /// Number of spheres already present in the collection.
        preexisting: usize,
    },

    /// Emitted when a sphere was accepted and appended.
    SpherePlaced {
        /// Position of the radius in the descending insertion queue.
        queue_index: usize,
        /// Sphere center, one entry per axis.
        center: Vec<f64>,
        /// Sphere radius.
        radius: f64,
        /// Number of candidate centers drawn, including the accepted one.
        attempts: usize,
    },

    /// Emitted when a radius exhausted its attempts and was dropped.
    SphereFailed {
        /// Position of the radius in the descending insertion queue.
        queue_index: usize,
        /// The dropped radius.
        radius: f64,
        /// Failures counted so far in this run, including this one.
        failures: usize,
    },

    /// Emitted when the failure limit was exceeded and the rest of the queue was abandoned.
    Aborted {
        /// Radii left unprocessed.
        remaining: usize,
    },

    /// Emitted when the run finishes, aborted or not.
    RunFinished {
        /// Final counts.
        report: PackReport,
    },

    /// Non-fatal warning generated during packing.
    Warning {
        /// Context string (e.g. queue position).
        context: String,
        /// Human-readable message.
        message: String,
    },
}

/// Discriminant of [`PackEvent`], used by sinks to declare interest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PackEventKind {
    RadiiGenerated,
    RunStarted,
    SpherePlaced,
    SphereFailed,
    Aborted,
    RunFinished,
    Warning,
}

impl PackEvent {
    pub fn kind(&self) -> PackEventKind {
        match self {
            PackEvent::RadiiGenerated { .. } => PackEventKind::RadiiGenerated,
            PackEvent::RunStarted { .. } => PackEventKind::RunStarted,
            PackEvent::SpherePlaced { .. } => PackEventKind::SpherePlaced,
            PackEvent::SphereFailed { .. } => PackEventKind::SphereFailed,
            PackEvent::Aborted { .. } => PackEventKind::Aborted,
            PackEvent::RunFinished { .. } => PackEventKind::RunFinished,
            PackEvent::Warning { .. } => PackEventKind::Warning,
        }
    }
}

/// A generic event sink that accepts [`PackEvent`]s.
pub trait EventSink {
    fn send(&mut self, event: PackEvent);

    /// Whether events of `kind` should be built and sent at all.
    #[inline]
    fn wants(&self, _kind: PackEventKind) -> bool {
        true
    }

    fn send_many<I>(&mut self, events: I)
    where
        Self: Sized,
        I: IntoIterator<Item = PackEvent>,
    {
        for e in events {
            self.send(e);
        }
    }
}

/// A no-op event sink.
impl EventSink for () {
    #[inline]
    fn send(&mut self, _event: PackEvent) {}

    #[inline]
    fn wants(&self, _kind: PackEventKind) -> bool {
        false
    }
}

/// An event sink that forwards to a user-provided closure.
pub struct FnSink<F>
where
    F: FnMut(PackEvent),
{
    f: F,
}

impl<F> FnSink<F>
where
    F: FnMut(PackEvent),
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> EventSink for FnSink<F>
where
    F: FnMut(PackEvent),
{
    #[inline]
    fn send(&mut self, event: PackEvent) {
        (self.f)(event);
    }
}

/// An event sink that collects events in a `Vec`, optionally restricted to some kinds.
#[derive(Default)]
pub struct VecSink {
    events: Vec<PackEvent>,
    only: Option<Vec<PackEventKind>>,
}

impl VecSink {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            only: None,
        }
    }

    /// Collect only events whose kind is in `kinds`.
    pub fn only(kinds: impl IntoIterator<Item = PackEventKind>) -> Self {
        Self {
            events: Vec::new(),
            only: Some(kinds.into_iter().collect()),
        }
    }

    pub fn into_inner(self) -> Vec<PackEvent> {
        self.events
    }

    pub fn as_slice(&self) -> &[PackEvent] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of collected events of `kind`.
    pub fn count(&self, kind: PackEventKind) -> usize {
        self.events.iter().filter(|e| e.kind() == kind).count()
    }
}

impl EventSink for VecSink {
    #[inline]
    fn send(&mut self, event: PackEvent) {
        if self.wants(event.kind()) {
            self.events.push(event);
        }
    }

    fn wants(&self, kind: PackEventKind) -> bool {
        self.only.as_ref().is_none_or(|kinds| kinds.contains(&kind))
    }
}

/// Fan-out sink that forwards each event to all contained sinks.
pub struct MultiSink<S: EventSink> {
    pub(crate) sinks: Vec<S>,
}

impl<S: EventSink> MultiSink<S> {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    pub fn with_sinks(sinks: Vec<S>) -> Self {
        Self { sinks }
    }

    pub fn push(&mut self, sink: S) {
        self.sinks.push(sink);
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }
}

impl<S: EventSink> Default for MultiSink<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: EventSink> EventSink for MultiSink<S> {
    fn send(&mut self, event: PackEvent) {
        let kind = event.kind();
        let interested: Vec<usize> = (0..self.sinks.len())
            .filter(|&i| self.sinks[i].wants(kind))
            .collect();
        let Some((&last, rest)) = interested.split_last() else {
            return;
        };
        for &i in rest {
            self.sinks[i].send(event.clone());
        }
        self.sinks[last].send(event);
    }

    fn wants(&self, kind: PackEventKind) -> bool {
        self.sinks.iter().any(|s| s.wants(kind))
    }
}
