//! Interrupt to foreground handoff
//!
//! Interrupt forwarders never call into application code. They post an
//! [`Event`] into an [`EventQueue`] and return; the application drains the
//! queue from its main loop or awaits it from a task.
//!
//! The queue is meant to live in a `static`:
//!
//! ```ignore
//! static EVENTS: EventQueue = EventQueue::new();
//! ```

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;
use portable_atomic::{AtomicU32, Ordering};

/// Queue capacity
pub const EVENT_QUEUE_DEPTH: usize = 16;

/// Something an interrupt observed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// ADC end of conversion in continuous mode
    AdcSample { channel: u8, value: u16 },
    /// Byte received on a USART with RX interrupts enabled
    UsartRx { usart: u8, byte: u8 },
    /// Edge on an external interrupt line
    Exti { line: u8 },
}

/// Bounded event queue plus the SysTick counter
pub struct EventQueue {
    events: Channel<CriticalSectionRawMutex, Event, EVENT_QUEUE_DEPTH>,
    tick_signal: Signal<CriticalSectionRawMutex, u32>,
    ticks: AtomicU32,
    dropped: AtomicU32,
}

impl EventQueue {
    pub const fn new() -> Self {
        Self {
            events: Channel::new(),
            tick_signal: Signal::new(),
            ticks: AtomicU32::new(0),
            dropped: AtomicU32::new(0),
        }
    }

    /// Queue an event from interrupt context
    ///
    /// Never blocks. When the queue is full the event is discarded, counted
    /// and `false` is returned.
    pub fn post(&self, event: Event) -> bool {
        match self.events.try_send(event) {
            Ok(()) => true,
            Err(_) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                false
            }
        }
    }

    /// Take the oldest event, if any
    pub fn try_recv(&self) -> Option<Event> {
        self.events.try_receive().ok()
    }

    /// Wait for the next event
    pub async fn recv(&self) -> Event {
        self.events.receive().await
    }

    /// Take every queued event, oldest first
    pub fn drain(&self) -> heapless::Vec<Event, EVENT_QUEUE_DEPTH> {
        let mut out = heapless::Vec::new();
        while let Some(event) = self.try_recv() {
            // Capacity equals the queue depth
            if out.push(event).is_err() {
                break;
            }
        }
        out
    }

    /// Count one SysTick period
    pub fn tick(&self) -> u32 {
        let now = self.ticks.fetch_add(1, Ordering::Relaxed).wrapping_add(1);
        self.tick_signal.signal(now);
        now
    }

    /// SysTick periods since start
    pub fn ticks(&self) -> u32 {
        self.ticks.load(Ordering::Relaxed)
    }

    /// Wait for the next SysTick and return the tick count
    pub async fn next_tick(&self) -> u32 {
        self.tick_signal.wait().await
    }

    /// Events discarded because the queue was full
    pub fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}
