// JVM backend for the managed runtime.
// Worker threads are attached on demand; threads the JVM already knows are never detached by us.

use std::cell::Cell;
use std::sync::Arc;

use jni::objects::{GlobalRef, JObject, JValue};
use jni::{JNIEnv, JavaVM};

use crate::domain::managed::service::{ManagedObject, ManagedRuntime};
use crate::domain::managed::value_object::{CallKind, ManagedValue};
use crate::error;

thread_local! {
    // (nesting depth, whether this thread was attached by the bridge)
    static ATTACHMENT: Cell<(usize, bool)> = Cell::new((0, false));
}

fn runtime_error(e: jni::errors::Error) -> error::Error {
    error::Error::create_runtime_error(&e.to_string())
}

pub struct JniRuntime {
    vm: Arc<JavaVM>,
}

impl JniRuntime {
    pub fn new(vm: JavaVM) -> Self {
        JniRuntime { vm: Arc::new(vm) }
    }

    pub fn from_env(env: &JNIEnv) -> Result<Self, error::Error> {
        let vm = env.get_java_vm().map_err(runtime_error)?;
        Ok(Self::new(vm))
    }

    /// Pins `object` with a global reference so it outlives the current native frame.
    pub fn durable_ref(
        &self,
        env: &JNIEnv,
        object: &JObject,
    ) -> Result<Arc<dyn ManagedObject>, error::Error> {
        let global = if object.is_null() {
            None
        } else {
            Some(env.new_global_ref(object).map_err(runtime_error)?)
        };
        Ok(Arc::new(JniObject {
            vm: self.vm.clone(),
            global,
        }))
    }
}

impl ManagedRuntime for JniRuntime {
    fn attach_current_thread(&self) -> Result<(), error::Error> {
        let (depth, owned) = ATTACHMENT.with(Cell::get);
        if depth > 0 {
            ATTACHMENT.with(|a| a.set((depth + 1, owned)));
            return Ok(());
        }

        let owned = self.vm.get_env().is_err();
        if owned {
            self.vm
                .attach_current_thread_permanently()
                .map_err(runtime_error)?;
        }
        ATTACHMENT.with(|a| a.set((1, owned)));
        Ok(())
    }

    fn detach_current_thread(&self) {
        let (depth, owned) = ATTACHMENT.with(Cell::get);
        match depth {
            0 => {}
            1 => {
                ATTACHMENT.with(|a| a.set((0, false)));
                if owned {
                    // no local references survive past the attachment scope
                    unsafe { self.vm.detach_current_thread() };
                }
            }
            _ => ATTACHMENT.with(|a| a.set((depth - 1, owned))),
        }
    }
}

/// Global reference to a JVM object. Dropping it deletes the global reference.
pub struct JniObject {
    vm: Arc<JavaVM>,
    global: Option<GlobalRef>,
}

enum LocalArg<'local> {
    Object(JObject<'local>),
    Int(i32),
    Long(i64),
}

impl<'local> LocalArg<'local> {
    fn new(env: &mut JNIEnv<'local>, value: &ManagedValue) -> jni::errors::Result<Self> {
        let arg = match value {
            ManagedValue::String(s) => LocalArg::Object(JObject::from(env.new_string(s)?)),
            ManagedValue::Bytes(b) => LocalArg::Object(JObject::from(env.byte_array_from_slice(b)?)),
            ManagedValue::Int(i) => LocalArg::Int(*i),
            ManagedValue::Long(l) => LocalArg::Long(*l),
        };
        Ok(arg)
    }

    fn value(&self) -> JValue<'local, '_> {
        match self {
            LocalArg::Object(o) => JValue::Object(o),
            LocalArg::Int(i) => JValue::Int(*i),
            LocalArg::Long(l) => JValue::Long(*l),
        }
    }
}

impl JniObject {
    fn invoke(
        &self,
        env: &mut JNIEnv,
        global: &GlobalRef,
        kind: CallKind,
        method: &str,
        signature: &str,
        args: &[ManagedValue],
    ) -> jni::errors::Result<()> {
        let locals = args
            .iter()
            .map(|value| LocalArg::new(env, value))
            .collect::<jni::errors::Result<Vec<_>>>()?;
        let values: Vec<JValue> = locals.iter().map(LocalArg::value).collect();

        match kind {
            CallKind::Instance => {
                env.call_method(global.as_obj(), method, signature, &values)?;
            }
            CallKind::Static => {
                let class = env.get_object_class(global.as_obj())?;
                env.call_static_method(&class, method, signature, &values)?;
            }
        }
        Ok(())
    }
}

impl ManagedObject for JniObject {
    fn is_valid(&self) -> bool {
        self.global.is_some()
    }

    fn call_method(
        &self,
        kind: CallKind,
        method: &str,
        signature: &str,
        args: &[ManagedValue],
    ) -> Result<(), error::Error> {
        let global = self
            .global
            .as_ref()
            .ok_or_else(|| error::Error::create_runtime_error("managed object is null"))?;
        let mut env = self.vm.get_env().map_err(runtime_error)?;

        let result = env.with_local_frame(args.len() as i32 + 4, |env| {
            self.invoke(env, global, kind, method, signature, args)
        });
        if let Err(e) = result {
            if env.exception_check().unwrap_or(false) {
                let _ = env.exception_describe();
                let _ = env.exception_clear();
            }
            return Err(runtime_error(e));
        }
        Ok(())
    }
}
