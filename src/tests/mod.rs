mod key;
mod slice;
