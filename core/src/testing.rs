//! In-memory board for exercising the lifecycle on the host

use std::collections::VecDeque;

use fugit::MicrosDurationU64;
use hal_abstractions::{
    Board, BoardError, Radio, RadioError, Rtc, RtcError, RtcField, SystemClock, Timestamp,
    WakeReason,
};
use node_protocol::{Packet, PacketType, SensorReport};

use crate::app::App;
use crate::error::AppError;
use crate::framework::Framework;

pub struct StubRtc {
    pub now: Timestamp,
    pub accuracy: MicrosDurationU64,
    pub alarm: Option<(u8, RtcField)>,
    pub alarm_installs: usize,
    /// Answers to successive alarm queries; `false` once exhausted
    pub triggers: VecDeque<bool>,
    /// Alarm queries that succeed before the RTC starts failing
    pub fail_status_after: Option<usize>,
    pub status_queries: usize,
    pub acks: usize,
    pub dumps: usize,
    pub healthy: bool,
    pub fail_now: bool,
}

impl Rtc for StubRtc {
    fn now(&mut self) -> Result<Timestamp, RtcError> {
        if self.fail_now {
            return Err(RtcError::HardwareError);
        }
        Ok(self.now)
    }

    fn accuracy(&self) -> MicrosDurationU64 {
        self.accuracy
    }

    fn set_time(&mut self, time: Timestamp) -> Result<(), RtcError> {
        self.now = time;
        Ok(())
    }

    fn set_periodic_alarm(&mut self, value: u8, field: RtcField) -> Result<(), RtcError> {
        self.alarm = Some((value, field));
        self.alarm_installs += 1;
        Ok(())
    }

    fn is_alarm_enabled(&mut self) -> Result<bool, RtcError> {
        Ok(self.alarm.is_some())
    }

    fn is_alarm_triggered(&mut self) -> Result<bool, RtcError> {
        if self.fail_status_after == Some(self.status_queries) {
            return Err(RtcError::HardwareError);
        }
        self.status_queries += 1;
        Ok(self.triggers.pop_front().unwrap_or(false))
    }

    fn acknowledge_alarm(&mut self) -> Result<(), RtcError> {
        self.acks += 1;
        Ok(())
    }

    fn is_healthy(&mut self) -> bool {
        self.healthy
    }

    fn dump(&mut self) {
        self.dumps += 1;
    }
}

#[derive(Default)]
pub struct StubRadio {
    pub sent: Vec<(Vec<u8>, u32)>,
    pub inbox: VecDeque<Vec<u8>>,
    pub tx_error: Option<RadioError>,
}

impl Radio for StubRadio {
    fn tx(&mut self, frame: &[u8], timeout_ms: u32) -> Result<(), RadioError> {
        if let Some(e) = self.tx_error {
            return Err(e);
        }
        self.sent.push((frame.to_vec(), timeout_ms));
        Ok(())
    }

    fn rx(&mut self, _timeout_ms: u32, buf: &mut [u8]) -> Result<usize, RadioError> {
        let frame = self.inbox.pop_front().ok_or(RadioError::Timeout)?;
        if frame.len() > buf.len() {
            return Err(RadioError::BufferTooSmall);
        }
        buf[..frame.len()].copy_from_slice(&frame);
        Ok(frame.len())
    }
}

#[derive(Default)]
pub struct StubClock {
    pub now: Timestamp,
    pub adjustments: Vec<i64>,
}

impl SystemClock for StubClock {
    fn now(&self) -> Timestamp {
        self.now
    }

    fn adjust(&mut self, offset: i64) {
        self.now = self.now.shifted(offset);
        self.adjustments.push(offset);
    }
}

pub struct StubBoard {
    pub rtc: StubRtc,
    pub radio: StubRadio,
    pub clock: StubClock,
    pub battery_mv: u16,
    pub uid: [u8; 12],
    pub fail_pre_rtc: bool,
    pub fail_post_rtc: bool,
    pub rtc_missing: bool,
    pub radio_missing: bool,
    /// Wake reasons for successive sleeps; `RTC_ALARM` once exhausted
    pub wakes: VecDeque<WakeReason>,
    pub events: Vec<&'static str>,
}

impl StubBoard {
    pub fn new() -> Self {
        Self {
            rtc: StubRtc {
                now: Timestamp::new(1_700_000_000, 0),
                accuracy: MicrosDurationU64::secs(1),
                alarm: None,
                alarm_installs: 0,
                triggers: VecDeque::new(),
                fail_status_after: None,
                status_queries: 0,
                acks: 0,
                dumps: 0,
                healthy: true,
                fail_now: false,
            },
            radio: StubRadio::default(),
            clock: StubClock::default(),
            battery_mv: 3700,
            uid: *b"123456789abc",
            fail_pre_rtc: false,
            fail_post_rtc: false,
            rtc_missing: false,
            radio_missing: false,
            wakes: VecDeque::new(),
            events: Vec::new(),
        }
    }

    pub fn sleeps(&self) -> usize {
        self.events.iter().filter(|e| **e == "deep_sleep").count()
    }
}

impl Board for StubBoard {
    type Rtc = StubRtc;
    type Radio = StubRadio;
    type Clock = StubClock;

    fn init_pre_rtc(&mut self) -> Result<(), BoardError> {
        self.events.push("init_pre_rtc");
        if self.fail_pre_rtc {
            return Err(BoardError::InitFailed);
        }
        Ok(())
    }

    fn init_post_rtc(&mut self) -> Result<(), BoardError> {
        self.events.push("init_post_rtc");
        if self.fail_post_rtc {
            return Err(BoardError::InitFailed);
        }
        Ok(())
    }

    fn deep_sleep(&mut self) -> WakeReason {
        self.events.push("deep_sleep");
        self.wakes.pop_front().unwrap_or(WakeReason::RTC_ALARM)
    }

    fn rtc(&mut self) -> Result<&mut StubRtc, BoardError> {
        if self.rtc_missing {
            return Err(BoardError::RtcUnavailable);
        }
        Ok(&mut self.rtc)
    }

    fn radio(&mut self) -> Result<&mut StubRadio, BoardError> {
        if self.radio_missing {
            return Err(BoardError::RadioUnavailable);
        }
        Ok(&mut self.radio)
    }

    fn clock(&mut self) -> &mut StubClock {
        &mut self.clock
    }

    fn battery_voltage(&mut self) -> u16 {
        self.battery_mv
    }

    fn unique_id(&self) -> &[u8] {
        &self.uid
    }
}

/// Application that records its callbacks and can be told to fail
#[derive(Default)]
pub struct StubApp {
    pub initialized: usize,
    pub triggered: usize,
    pub usb_powered: usize,
    pub init_error: Option<AppError>,
    pub trigger_error: Option<AppError>,
    pub usb_error: Option<AppError>,
    /// Send a battery report from `triggered`
    pub report_on_trigger: bool,
}

impl App<StubBoard> for StubApp {
    fn initialize(&mut self, _framework: &mut Framework<StubBoard>) -> Result<(), AppError> {
        self.initialized += 1;
        self.init_error.map_or(Ok(()), Err)
    }

    fn triggered(&mut self, framework: &mut Framework<StubBoard>) -> Result<(), AppError> {
        self.triggered += 1;
        if self.report_on_trigger {
            let battery_mv = framework.board_mut().battery_voltage();
            let mut packet = Packet::new();
            let mut report = SensorReport::attach(&mut packet);
            report
                .add_battery_voltage(battery_mv)
                .map_err(|_| AppError::Failed("report full"))?;
            framework.send(&mut report, PacketType::SENSOR_REPORT)?;
        }
        self.trigger_error.map_or(Ok(()), Err)
    }

    fn usb_powered(&mut self, _framework: &mut Framework<StubBoard>) -> Result<(), AppError> {
        self.usb_powered += 1;
        self.usb_error.map_or(Ok(()), Err)
    }
}
