//! Cross-subsystem scenarios.

#[cfg(test)]
mod fixtures;

#[cfg(test)]
mod batch_exchange;

#[cfg(test)]
mod lookup_flow;
