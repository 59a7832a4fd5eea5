//! Wire types returned by the chart endpoint.

mod chart;

pub use self::chart::ChartRecord;
