//! Node lifecycle state machine

use core::convert::Infallible;

use hal_abstractions::{Board, Radio, Rtc, RtcError, WakeReason};
use node_protocol::{Alerts, Message, Packet, PacketType, CURRENT_VERSION};

use crate::app::App;
use crate::config::FrameworkConfig;
use crate::device_id::DeviceId;
use crate::error::{FrameworkError, ReceiveError, SendError};
use crate::time;

/// Lifecycle states, in the order they are entered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LifecycleState {
    Start,
    PreRtcInit,
    AcquireRtc,
    SyncTime,
    PostRtcInit,
    AppInit,
    CheckAlarm,
    DeepSleep,
    /// A fatal error was returned from [`Framework::run`]
    Halted,
}

/// Counters kept across wake cycles
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FrameworkStats {
    /// Completed sleep/wake cycles
    pub cycles: u32,
    /// Alarms handed to the application
    pub triggers: u32,
    /// Non-fatal application callback failures
    pub app_errors: u32,
    pub usb_wakes: u32,
}

/// RTC handle that was available at startup has gone away
fn lost_rtc() -> FrameworkError {
    FrameworkError::AlarmStatus(RtcError::NotInitialized)
}

/// Query the alarm flag, dumping RTC state if the query itself fails
fn alarm_triggered<R: Rtc + ?Sized>(rtc: &mut R) -> Result<bool, FrameworkError> {
    match rtc.is_alarm_triggered() {
        Ok(triggered) => Ok(triggered),
        Err(e) => {
            rtc.dump();
            Err(FrameworkError::AlarmStatus(e))
        }
    }
}

/// Fill `packet` from the radio and rewind it to the payload
fn receive_into<R: Radio + ?Sized>(
    radio: &mut R,
    packet: &mut Packet,
    timeout_ms: u32,
) -> Result<usize, ReceiveError> {
    let len = radio.rx(timeout_ms, packet.as_mut_buffer())?;
    packet.set_length(len)?;
    packet.rewind();
    Ok(len)
}

/// Owns the board and drives the application through the node lifecycle
pub struct Framework<B: Board> {
    board: B,
    config: FrameworkConfig,
    device_id: DeviceId,
    state: LifecycleState,
    stats: FrameworkStats,
}

impl<B: Board> Framework<B> {
    pub fn new(board: B) -> Self {
        Self::with_config(board, FrameworkConfig::default())
    }

    pub fn with_config(board: B, config: FrameworkConfig) -> Self {
        let device_id = DeviceId::from_uid(board.unique_id());
        info!("Device ID: {}", device_id.get());

        Self {
            board,
            config,
            device_id,
            state: LifecycleState::Start,
            stats: FrameworkStats::default(),
        }
    }

    pub fn device_id(&self) -> DeviceId {
        self.device_id
    }

    pub fn config(&self) -> &FrameworkConfig {
        &self.config
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn stats(&self) -> FrameworkStats {
        self.stats
    }

    pub fn board(&self) -> &B {
        &self.board
    }

    /// Board access for applications (sensors, RTC)
    pub fn board_mut(&mut self) -> &mut B {
        &mut self.board
    }

    pub fn into_board(self) -> B {
        self.board
    }

    /// Run the full lifecycle; only returns on a fatal error
    ///
    /// The board is put into deep sleep one last time before returning,
    /// so a watchdog or USB wake can restart it.
    pub fn run<A: App<B>>(&mut self, app: &mut A) -> Result<Infallible, FrameworkError> {
        let err = match self.start(app) {
            Ok(()) => loop {
                if let Err(e) = self.cycle(app) {
                    break e;
                }
            },
            Err(e) => e,
        };

        self.halt(&err);
        Err(err)
    }

    /// Bring the board up and initialize the application
    pub fn start<A: App<B>>(&mut self, app: &mut A) -> Result<(), FrameworkError> {
        self.enter(LifecycleState::PreRtcInit);
        self.board
            .init_pre_rtc()
            .map_err(FrameworkError::PreRtcInit)?;

        self.enter(LifecycleState::AcquireRtc);
        self.board.rtc().map_err(FrameworkError::RtcUnavailable)?;

        self.enter(LifecycleState::SyncTime);
        time::sync_from_rtc(&mut self.board, &self.config)?;

        self.enter(LifecycleState::PostRtcInit);
        self.board
            .init_post_rtc()
            .map_err(FrameworkError::PostRtcInit)?;

        self.enter(LifecycleState::AppInit);
        app.initialize(self).map_err(FrameworkError::AppInit)?;

        Ok(())
    }

    /// One pass of the alarm loop: check, dispatch, sleep
    ///
    /// Returns the reason the board woke up.
    pub fn cycle<A: App<B>>(&mut self, app: &mut A) -> Result<WakeReason, FrameworkError> {
        self.enter(LifecycleState::CheckAlarm);

        let rtc = self.board.rtc().map_err(|_| lost_rtc())?;
        let triggered = alarm_triggered(rtc)?;

        if triggered {
            if let Err(e) = self.acknowledge_alarm() {
                warn!("Failed to acknowledge alarm: {:?}", e);
            }

            self.stats.triggers = self.stats.triggers.wrapping_add(1);
            if let Err(e) = app.triggered(self) {
                self.stats.app_errors = self.stats.app_errors.wrapping_add(1);
                warn!("App trigger handler failed: {:?}", e);
            }
        }

        self.enter(LifecycleState::DeepSleep);
        let reason = self.board.deep_sleep();
        self.stats.cycles = self.stats.cycles.wrapping_add(1);
        trace!("Woke up (reason {})", reason.bits());

        if reason.contains(WakeReason::USB) {
            self.stats.usb_wakes = self.stats.usb_wakes.wrapping_add(1);
            if let Err(e) = app.usb_powered(self) {
                self.stats.app_errors = self.stats.app_errors.wrapping_add(1);
                warn!("App USB handler failed: {:?}", e);
            }
        }

        Ok(reason)
    }

    /// Stamp the header, checksum and transmit a message
    ///
    /// Version, Type, NetworkID, DeviceID and Alerts are all overwritten.
    pub fn send<M: Message + ?Sized>(
        &mut self,
        message: &mut M,
        packet_type: PacketType,
    ) -> Result<(), SendError> {
        // Sampled before the radio borrow; needs the RTC and battery
        let alerts = self.current_alerts();
        let device_id = self.device_id.get();
        let network_id = self.config.network_id;
        let timeout_ms = self.config.tx_timeout_ms;

        let radio = self.board.radio()?;

        let packet = message.packet_mut();
        packet.set_version(CURRENT_VERSION);
        packet.set_packet_type(packet_type);
        packet.set_network_id(network_id);
        packet.set_device_id(device_id);
        packet.set_alerts(alerts);
        packet.update_crc();

        debug!(
            "TX type {} ({} bytes, alerts {})",
            packet_type.0,
            packet.len(),
            alerts.bits()
        );
        radio.tx(packet.as_bytes(), timeout_ms)?;
        Ok(())
    }

    /// Receive one frame into `packet` and verify it
    ///
    /// On success the cursor is at the first payload byte. Frames shorter
    /// than their header, or with a bad checksum, are rejected.
    pub fn receive(&mut self, packet: &mut Packet, timeout_ms: u32) -> Result<(), ReceiveError> {
        let radio = self.board.radio()?;
        let len = receive_into(radio, packet, timeout_ms)?;

        if len < packet.header_len() {
            warn!("RX short frame ({} bytes)", len);
            return Err(ReceiveError::ShortFrame { len });
        }

        if !packet.crc_is_valid() {
            let stored = packet.crc();
            warn!("RX checksum mismatch from {}", packet.device_id());
            return Err(ReceiveError::BadChecksum { stored });
        }

        debug!("RX type {} ({} bytes)", packet.packet_type().0, len);
        Ok(())
    }

    /// Alert flags describing the node's current health
    pub fn current_alerts(&mut self) -> Alerts {
        let mut alerts = Alerts::NONE;

        let battery_mv = self.board.battery_voltage();
        if battery_mv < self.config.low_battery_mv {
            alerts |= Alerts::BATT_LOW;
        }
        if battery_mv < self.config.critical_battery_mv {
            alerts |= Alerts::BATT_CRITICAL;
        }

        let rtc_ok = match self.board.rtc() {
            Ok(rtc) => rtc.is_healthy(),
            Err(_) => false,
        };
        if !rtc_ok {
            alerts |= Alerts::RTC_FAILURE;
        }

        alerts
    }

    fn acknowledge_alarm(&mut self) -> Result<(), FrameworkError> {
        let rtc = self.board.rtc().map_err(|_| lost_rtc())?;
        rtc.acknowledge_alarm().map_err(FrameworkError::AlarmStatus)
    }

    fn enter(&mut self, state: LifecycleState) {
        if self.state != state {
            info!("State: {:?} -> {:?}", self.state, state);
            self.state = state;
        }
    }

    fn halt(&mut self, err: &FrameworkError) {
        error!("Fatal error in {:?}: {:?}", err.state(), err);
        self.state = LifecycleState::Halted;
        // Wake reason is irrelevant, the caller resets
        self.board.deep_sleep();
    }
}
