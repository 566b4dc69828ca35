#[cfg(test)]
mod dial_flow;
#[cfg(test)]
mod enumeration;
#[cfg(test)]
mod util;
