//! Run-level delivery statistics.

use std::fmt;

use sg_sim::SimulationContext;

/// Condensed outcome of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryStats {
    pub flows:            usize,
    pub delivered:        usize,
    /// Mean end-to-end delay over delivered flows.
    pub mean_delay_secs:  Option<f64>,
    pub mean_hop_count:   Option<f64>,
    /// SEND, RECOVER and JBR frames put on the air.
    pub data_frames:      u64,
    pub hello_broadcasts: u64,
    pub drops:            u64,
}

impl DeliveryStats {
    pub fn from_context(ctx: &SimulationContext) -> Self {
        let delays: Vec<f64> = ctx.flows.iter().filter_map(|f| f.delay_secs()).collect();
        let hops: Vec<f64> = ctx.flows.iter().filter_map(|f| f.hop_count).map(f64::from).collect();
        Self {
            flows: ctx.flows.len(),
            delivered: delays.len(),
            mean_delay_secs: mean(&delays),
            mean_hop_count: mean(&hops),
            data_frames: ctx.data_broadcasts + ctx.unicasts,
            hello_broadcasts: ctx.hello_broadcasts,
            drops: ctx.drops.values().sum(),
        }
    }

    /// Delivered flows over started flows; `0.0` for a run with no traffic.
    pub fn delivery_ratio(&self) -> f64 {
        if self.flows == 0 {
            0.0
        } else {
            self.delivered as f64 / self.flows as f64
        }
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    (!values.is_empty()).then(|| values.iter().sum::<f64>() / values.len() as f64)
}

impl fmt::Display for DeliveryStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "delivered {}/{} ({:.1}%)",
            self.delivered,
            self.flows,
            self.delivery_ratio() * 100.0
        )?;
        if let Some(d) = self.mean_delay_secs {
            write!(f, ", mean delay {:.2} ms", d * 1000.0)?;
        }
        if let Some(h) = self.mean_hop_count {
            write!(f, ", mean hops {h:.2}")?;
        }
        write!(f, ", {} data frames, {} drops", self.data_frames, self.drops)
    }
}
