pub mod topology;

pub use topology::{
    ExportOptions, ImportOptions, Topology, TopologyError, object_export, object_import, update_pools,
};
