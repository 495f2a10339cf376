// ==========================================
// 持久化测试
// ==========================================
// 职责: 验证参数值跨“重启”（重新打开数据库）保持
// ==========================================


#[cfg(test)]
mod persistence_test {
    use crate::test_helpers::{create_test_config, demo_registry, open_store};
    use nvs_params::{KvStore, ParamError, ParamRegistry, StoreConfig};

    #[test]
    fn test_values_survive_reopen() {
        let (_temp_file, config) = create_test_config().unwrap();

        {
            let registry = demo_registry(open_store(&config));
            registry.set_param("wifi_ssid", "HomeNet").unwrap();
            registry.set_param("retry_count", "7").unwrap();
            // 临时参数只改内存
            let err = registry.set_param("verbose", "1").unwrap_err();
            assert!(err.is_unsupported());
        }

        let registry = demo_registry(open_store(&config));
        let listing = registry.list_all();
        assert_eq!(listing[0].value, "HomeNet");
        assert_eq!(listing[1].value, "");
        assert_eq!(listing[2].value, "7");
        assert_eq!(listing[3].value, "false");
    }

    #[test]
    fn test_int_param_first_boot_then_set() {
        let (_temp_file, config) = create_test_config().unwrap();

        let store = open_store(&config);
        let mut registry = ParamRegistry::new(store.clone());
        let retry = registry.declare("retry_count", 3i32).unwrap();
        assert_eq!(retry.get(), 3);
        assert!(!store.contains("retry_count").unwrap());

        retry.set(5).unwrap();
        assert_eq!(store.get("retry_count", 5).unwrap(), 5i32.to_le_bytes().to_vec());

        drop(registry);
        let mut registry = ParamRegistry::new(open_store(&config));
        let retry = registry.declare("retry_count", 3i32).unwrap();
        assert_eq!(retry.get(), 5);
    }

    #[test]
    fn test_bool_param_from_string() {
        let (_temp_file, config) = create_test_config().unwrap();
        let store = open_store(&config);
        let mut registry = ParamRegistry::new(store.clone());
        let flag = registry.declare("flag", false).unwrap();

        flag.set_from_string("1").unwrap();
        assert!(flag.get());
        assert_eq!(flag.to_display_string(), "true");
        assert_eq!(store.get("flag", 2).unwrap(), vec![1u8]);

        let err = flag.set_from_string("maybe").unwrap_err();
        assert!(matches!(err, ParamError::InvalidArgument { .. }));
        assert!(flag.get());
    }

    #[test]
    fn test_clean_then_reopen_falls_back_to_default() {
        let (_temp_file, config) = create_test_config().unwrap();

        {
            let mut registry = ParamRegistry::new(open_store(&config));
            let ssid = registry.declare("wifi_ssid", "default".to_string()).unwrap();
            ssid.set("Office".to_string()).unwrap();
            ssid.clean().unwrap();
            // 内存值不受 clean 影响
            assert_eq!(ssid.get(), "Office");
        }

        let mut registry = ParamRegistry::new(open_store(&config));
        let ssid = registry.declare("wifi_ssid", "default".to_string()).unwrap();
        assert_eq!(ssid.get(), "default");
    }

    #[test]
    fn test_corrupt_entry_is_swallowed_at_declare() {
        let (_temp_file, config) = create_test_config().unwrap();
        let store = open_store(&config);
        store.put("retry_count", &[1, 2]).unwrap();

        let mut registry = ParamRegistry::new(store);
        let retry = registry.declare("retry_count", 3i32).unwrap();
        assert_eq!(retry.get(), 3);
        assert!(matches!(retry.load().unwrap_err(), ParamError::Decode { .. }));
    }

    #[test]
    fn test_erase_all_then_reopen() {
        let (_temp_file, config) = create_test_config().unwrap();

        {
            let registry = demo_registry(open_store(&config));
            registry.set_param("retry_count", "9").unwrap();
            registry.erase_all().unwrap();
            assert_eq!(registry.list_all()[2].value, "9");
        }

        let registry = demo_registry(open_store(&config));
        assert_eq!(registry.list_all()[2].value, "3");
    }

    #[test]
    fn test_namespaces_share_one_file() {
        let (_temp_file, config) = create_test_config().unwrap();
        let other = StoreConfig {
            namespace: "factory".to_string(),
            ..config.clone()
        };

        let mut main_registry = ParamRegistry::new(open_store(&config));
        let mut factory_registry = ParamRegistry::new(open_store(&other));
        let main_retry = main_registry.declare("retry_count", 3i32).unwrap();
        let factory_retry = factory_registry.declare("retry_count", 1i32).unwrap();

        main_retry.set(10).unwrap();
        factory_retry.set(2).unwrap();
        factory_registry.erase_all().unwrap();
        assert!(factory_retry.load().unwrap_err().is_not_found());

        main_retry.load().unwrap();
        assert_eq!(main_retry.get(), 10);
    }
}
