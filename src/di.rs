use shaku::*;

use crate::infra::runtime::DetachedRuntime;

module! {
    pub RuntimeModule {
        components = [DetachedRuntime],
        providers = []
    }
}

#[cfg(test)]
mod test_runtime_module {
    use super::*;
    use crate::domain::managed::service::ManagedRuntime;

    #[test]
    fn resolves_detached_runtime() {
        let module = RuntimeModule::builder().build();
        let runtime: &dyn ManagedRuntime = module.resolve_ref();
        assert!(runtime.attach_current_thread().is_ok());
        runtime.detach_current_thread();
    }
}
