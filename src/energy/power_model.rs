//! Instantaneous power computation for a radio state snapshot.
//!
//! Maps a radio's mode, sub-states, and in-flight signal parts to a power
//! breakdown (total, RX, TX) using a per-state `PowerProfile`. The mapping is
//! a pure function over closed enums; there is no failure path.

use serde::Deserialize;

use super::types::{RadioMode, RadioStateSnapshot, ReceptionState, SignalPart, TransmissionState};

/// Per-state power draw of a radio, in watts. Read-only input to the power
/// computation; loaded from a TOML profile file or taken from a preset.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PowerProfile {
    /// Draw with the radio fully powered down.
    pub off: f64,
    /// Draw in low-power sleep.
    pub sleep: f64,
    /// Draw while switching between modes.
    pub switching: f64,
    /// Draw while listening on a clear channel.
    pub rx_idle: f64,
    /// Draw while the channel is occupied without a decodable frame.
    pub rx_busy: f64,
    /// Draw while decoding a frame preamble.
    pub rx_preamble: f64,
    /// Draw while decoding a frame header.
    pub rx_header: f64,
    /// Draw while decoding frame data (also used for whole-frame reception).
    pub rx_data: f64,
    /// Draw with the transmitter enabled but not radiating.
    pub tx_idle: f64,
    /// Draw while transmitting a frame preamble.
    pub tx_preamble: f64,
    /// Draw while transmitting a frame header.
    pub tx_header: f64,
    /// Draw while transmitting frame data (also used for whole frames).
    pub tx_data: f64,
}

impl PowerProfile {
    /// Preset modeled on the TI CC2420 at 3.0 V: 20 µA power-down, 426 µA
    /// idle, 18.8 mA receive, 17.4 mA transmit at 0 dBm.
    pub const fn cc2420() -> Self {
        Self {
            off: 0.0,
            sleep: 60.0e-6,
            switching: 1.28e-3,
            rx_idle: 56.4e-3,
            rx_busy: 56.4e-3,
            rx_preamble: 56.4e-3,
            rx_header: 56.4e-3,
            rx_data: 56.4e-3,
            tx_idle: 1.28e-3,
            tx_preamble: 52.2e-3,
            tx_header: 52.2e-3,
            tx_data: 52.2e-3,
        }
    }

    /// Checks that every per-state value is a finite, non-negative wattage.
    pub fn validate(&self) -> Result<(), String> {
        let fields = [
            ("off", self.off),
            ("sleep", self.sleep),
            ("switching", self.switching),
            ("rx-idle", self.rx_idle),
            ("rx-busy", self.rx_busy),
            ("rx-preamble", self.rx_preamble),
            ("rx-header", self.rx_header),
            ("rx-data", self.rx_data),
            ("tx-idle", self.tx_idle),
            ("tx-preamble", self.tx_preamble),
            ("tx-header", self.tx_header),
            ("tx-data", self.tx_data),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("power value '{}' must be a non-negative number, got {}", name, value));
            }
        }
        Ok(())
    }
}

/// Instantaneous power draw split into reception and transmission shares.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerBreakdown {
    /// Total draw, including idle/busy listening cost.
    pub total: f64,
    /// Share attributed to active frame decoding.
    pub rx: f64,
    /// Share attributed to active transmission.
    pub tx: f64,
}

impl PowerBreakdown {
    /// Breakdown for the fixed-draw modes (Off/Sleep/Switching): no RX or TX
    /// share, the mode cost is the whole draw.
    pub const fn fixed(watts: f64) -> Self {
        Self { total: watts, rx: 0.0, tx: 0.0 }
    }
}

/// Computes the power breakdown for one radio state.
///
/// Off/Sleep/Switching map straight to their fixed mode cost. Otherwise the
/// receiver and transmitter chains contribute independently and are summed.
/// Idle and busy listening costs count toward the total only; the `rx`/`tx`
/// split carries active frame decoding and radiating exclusively.
pub fn compute(
    profile: &PowerProfile,
    mode: RadioMode,
    reception: ReceptionState,
    transmission: TransmissionState,
    received_part: SignalPart,
    transmitted_part: SignalPart,
) -> PowerBreakdown {
    match mode {
        RadioMode::Off => return PowerBreakdown::fixed(profile.off),
        RadioMode::Sleep => return PowerBreakdown::fixed(profile.sleep),
        RadioMode::Switching => return PowerBreakdown::fixed(profile.switching),
        RadioMode::Receiver | RadioMode::Transmitter | RadioMode::Transceiver => {}
    }

    let mut base = 0.0;
    let mut rx = 0.0;
    let mut tx = 0.0;

    if matches!(mode, RadioMode::Receiver | RadioMode::Transceiver) {
        match reception {
            ReceptionState::Idle => base += profile.rx_idle,
            ReceptionState::Busy => base += profile.rx_busy,
            ReceptionState::Receiving => match received_part {
                SignalPart::None => {}
                SignalPart::Whole | SignalPart::Data => rx += profile.rx_data,
                SignalPart::Preamble => rx += profile.rx_preamble,
                SignalPart::Header => rx += profile.rx_header,
            },
            ReceptionState::Undefined => {}
        }
    }

    if matches!(mode, RadioMode::Transmitter | RadioMode::Transceiver) {
        match transmission {
            TransmissionState::Idle => base += profile.tx_idle,
            TransmissionState::Transmitting => match transmitted_part {
                SignalPart::None => {}
                SignalPart::Whole | SignalPart::Data => tx += profile.tx_data,
                SignalPart::Preamble => tx += profile.tx_preamble,
                SignalPart::Header => tx += profile.tx_header,
            },
            TransmissionState::Undefined => {}
        }
    }

    PowerBreakdown { total: base + rx + tx, rx, tx }
}

/// Convenience wrapper computing the breakdown for a full snapshot.
pub fn compute_for_snapshot(profile: &PowerProfile, snapshot: &RadioStateSnapshot) -> PowerBreakdown {
    compute(
        profile,
        snapshot.mode,
        snapshot.reception,
        snapshot.transmission,
        snapshot.received_part,
        snapshot.transmitted_part,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn distinct_profile() -> PowerProfile {
        PowerProfile {
            off: 0.0,
            sleep: 0.001,
            switching: 0.002,
            rx_idle: 0.01,
            rx_busy: 0.02,
            rx_preamble: 0.03,
            rx_header: 0.04,
            rx_data: 0.05,
            tx_idle: 0.005,
            tx_preamble: 0.055,
            tx_header: 0.057,
            tx_data: 0.06,
        }
    }

    fn eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn fixed_modes_have_no_rx_tx_share() {
        let p = distinct_profile();
        for (mode, expected) in [
            (RadioMode::Off, p.off),
            (RadioMode::Sleep, p.sleep),
            (RadioMode::Switching, p.switching),
        ] {
            let b = compute(
                &p,
                mode,
                ReceptionState::Receiving,
                TransmissionState::Transmitting,
                SignalPart::Data,
                SignalPart::Data,
            );
            assert!(eq(b.total, expected));
            assert!(eq(b.rx, 0.0));
            assert!(eq(b.tx, 0.0));
        }
    }

    #[test]
    fn receiving_data_feeds_rx_split() {
        let p = distinct_profile();
        let b = compute(
            &p,
            RadioMode::Transceiver,
            ReceptionState::Receiving,
            TransmissionState::Idle,
            SignalPart::Data,
            SignalPart::None,
        );
        assert!(eq(b.total, p.rx_data + p.tx_idle));
        assert!(eq(b.rx, p.rx_data));
        assert!(eq(b.tx, 0.0));
    }

    #[test]
    fn idle_and_busy_count_only_toward_total() {
        let p = distinct_profile();
        let b = compute(
            &p,
            RadioMode::Transceiver,
            ReceptionState::Busy,
            TransmissionState::Idle,
            SignalPart::None,
            SignalPart::None,
        );
        assert!(eq(b.total, p.rx_busy + p.tx_idle));
        assert!(eq(b.rx, 0.0));
        assert!(eq(b.tx, 0.0));
    }

    #[test]
    fn whole_part_uses_data_power() {
        let p = distinct_profile();
        let b = compute(
            &p,
            RadioMode::Receiver,
            ReceptionState::Receiving,
            TransmissionState::Undefined,
            SignalPart::Whole,
            SignalPart::None,
        );
        assert!(eq(b.rx, p.rx_data));
        assert!(eq(b.total, p.rx_data));
    }

    #[test]
    fn signal_part_none_contributes_nothing() {
        let p = distinct_profile();
        let b = compute(
            &p,
            RadioMode::Transceiver,
            ReceptionState::Receiving,
            TransmissionState::Transmitting,
            SignalPart::None,
            SignalPart::None,
        );
        assert!(eq(b.total, 0.0));
        assert!(eq(b.rx, 0.0));
        assert!(eq(b.tx, 0.0));
    }

    #[test]
    fn transceiver_sums_both_chains() {
        let p = distinct_profile();
        let b = compute(
            &p,
            RadioMode::Transceiver,
            ReceptionState::Receiving,
            TransmissionState::Transmitting,
            SignalPart::Preamble,
            SignalPart::Header,
        );
        assert!(eq(b.rx, p.rx_preamble));
        assert!(eq(b.tx, p.tx_header));
        assert!(eq(b.total, p.rx_preamble + p.tx_header));
    }

    #[test]
    fn undefined_sub_states_contribute_nothing() {
        let p = distinct_profile();
        let b = compute(
            &p,
            RadioMode::Transceiver,
            ReceptionState::Undefined,
            TransmissionState::Undefined,
            SignalPart::Data,
            SignalPart::Data,
        );
        assert!(eq(b.total, 0.0));
    }

    #[test]
    fn compute_is_deterministic() {
        let p = distinct_profile();
        let args = (
            RadioMode::Transceiver,
            ReceptionState::Receiving,
            TransmissionState::Transmitting,
            SignalPart::Data,
            SignalPart::Preamble,
        );
        let a = compute(&p, args.0, args.1, args.2, args.3, args.4);
        let b = compute(&p, args.0, args.1, args.2, args.3, args.4);
        assert_eq!(a, b);
    }

    #[test]
    fn preset_validates() {
        assert!(PowerProfile::cc2420().validate().is_ok());
    }

    #[test]
    fn validate_rejects_negative_values() {
        let mut p = PowerProfile::cc2420();
        p.tx_data = -1.0;
        assert!(p.validate().is_err());
    }
}
