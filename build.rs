fn main() {
    println!("cargo:rerun-if-env-changed=HOMEDIC_CONFIG_JSON");
    println!("cargo:rerun-if-env-changed=HOMEDIC_MQTT_URL");
    println!("cargo:rerun-if-env-changed=HOMEDIC_WIFI_SSID");
    println!("cargo:rerun-if-env-changed=HOMEDIC_WIFI_PASS");

    // Host builds (tests, fuzzing) have no ESP-IDF toolchain to locate.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
