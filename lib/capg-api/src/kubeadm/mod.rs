/// Bindings to the kubeadm configuration API
///
/// Only the v1beta1 ClusterConfiguration is modelled, since that is what the
/// GCE provider spec embeds to drive `kubeadm init` on the control plane.

pub mod v1beta1;

pub use v1beta1::ClusterConfiguration;
