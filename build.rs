fn main() {
    // Host builds need no ESP-IDF environment; the device build exports it.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
