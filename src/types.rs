/// Firing rate in Hz. Zero means the neuron never fires.
pub type FiringRate = f64;

/// Spike times of a single neuron in ms, strictly increasing.
pub type SpikeTrain = Vec<f64>;

/// One spike train per neuron, indexed by neuron id.
pub type SpikeTrainSet = Vec<SpikeTrain>;

pub fn empty_spike_train_set(num_neurons: usize) -> SpikeTrainSet {
    vec![Vec::new(); num_neurons]
}
