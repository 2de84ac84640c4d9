mod contract;
mod in_memory;
