mod collection;
mod properties;
