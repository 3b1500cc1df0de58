pub mod na;
pub mod functors;
pub mod align;
pub mod backend;
pub mod window;
pub mod transform;
pub mod date_policy;
pub mod partition;
pub mod time_series;
pub mod error;
pub mod config;
pub mod logging;


pub use na::{na_guard, NaValue, Numeric};
pub use functors::{BinaryFunctor, Divide, Minus, Multiply, Plus, Promote};
pub use align::{breaks, intersection_map, RangeSpecifier};
pub use backend::{Backend, Buffer, Ownership};
pub use window::{window_apply, FixedWindow, Reducer, WindowStrategy};
pub use transform::{ColumnTransform, ColumnTransformWith};
pub use date_policy::{DatePolicy, GregorianDays, PosixSeconds};
pub use partition::{Daily, Hourly, Minutely, Monthly, PartitionFunction, Quarterly, Weekly, Yearly};
pub use time_series::{FloatIndex, IndexValue, TimeSeries};
pub use error::SeriesError;
pub use config::{ConfigError, EngineConfig};
pub use logging::init_tracing;
