pub mod port_probe;

pub use port_probe::{LsofProbe, NetstatProbe, PortProbe, PortProbeChain, PORT_PROBE_TIMEOUT};
