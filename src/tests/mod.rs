mod support;

mod motion;
mod pool;
mod position;
