pub mod sdq;
