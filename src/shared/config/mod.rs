mod model;

pub use model::{
    BestCityOrderConfig, IndexConfig, InputConfig, JobsConfig, LoggingConfig, OrdersByYearConfig,
    SampledOrdersConfig, Settings, TopClientConfig, TopOrdersConfig, load_settings,
};
